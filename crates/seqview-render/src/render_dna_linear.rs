//! Linear view: one horizontal line per block, feature rows stacked above the
//! bases and the complement strand underneath.

use crate::RenderedView;
use crate::elements::{ElementGeometry, ElementKind, ElementMeta, MountedElement};
use crate::style::{
    CUT_SITE_COLOR, FONT_FAMILY, INDEX_COLOR, MUTED_TEXT_COLOR, SELECTION_COLOR,
    SELECTION_EDGE_COLOR, TEXT_COLOR, amino_acid_color, base_color, estimate_text_width,
    truncate_label,
};
use seqview_engine::{AminoAcidClass, Block, Fragment, ReadingFrame};
use seqview_protocol::{
    Annotation, CutSite, DEFAULT_HIGHLIGHT_COLOR, Direction, DisplayPosition, Range, Ranged,
    Selection, SequenceType, ViewMode,
};
use std::sync::Arc;
use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Group, Line, Path, Rectangle, Text};

pub const MARGIN_LEFT: f64 = 28.0;
const MARGIN_RIGHT: f64 = 28.0;
const INDEX_HEIGHT: f64 = 20.0;
const TRANSLATION_HEIGHT: f64 = 16.0;
const ANNOTATION_HEIGHT: f64 = 14.0;
const ANNOTATION_GAP: f64 = 3.0;
const CUT_SITE_ROW_HEIGHT: f64 = 14.0;
const BLOCK_GAP: f64 = 14.0;
const ARROW_WIDTH: f64 = 6.0;
const LABEL_FONT_SIZE: f64 = 10.0;
const CUT_HIT_WIDTH: f64 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LinearOptions {
    pub width: f64,
    pub char_width: f64,
    pub line_height: f64,
    pub bases_per_line: usize,
    pub show_index: bool,
    pub show_complement: bool,
    pub show_annotations: bool,
    pub show_cut_sites: bool,
    pub show_translation: bool,
}

impl Default for LinearOptions {
    fn default() -> Self {
        Self {
            width: 800.0,
            char_width: 7.5,
            line_height: 16.0,
            bases_per_line: 100,
            show_index: true,
            show_complement: true,
            show_annotations: true,
            show_cut_sites: true,
            show_translation: true,
        }
    }
}

impl LinearOptions {
    /// Bases that fit on one line at the current width.
    pub fn fitting_bases_per_line(width: f64, char_width: f64) -> usize {
        if char_width <= 0.0 {
            return 1;
        }
        (((width - MARGIN_LEFT - MARGIN_RIGHT) / char_width).floor() as usize).max(1)
    }
}

/// Everything the linear renderer draws from.
#[derive(Debug, Clone)]
pub struct LinearScene<'a> {
    pub seq: &'a str,
    /// Complement strand, empty when there is none to show.
    pub complement: &'a str,
    pub seq_type: SequenceType,
    pub blocks: &'a [Block],
    pub selection: Option<Selection>,
}

/// Vertical offsets of the parts of one block, relative to its top.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BlockLayout {
    translation_top: f64,
    annotation_top: f64,
    cut_site_top: f64,
    sequence_top: f64,
    complement_top: Option<f64>,
    height: f64,
}

fn layout_block(block: &Block, options: &LinearOptions, has_complement: bool) -> BlockLayout {
    let mut y = 0.0;
    if options.show_index {
        y += INDEX_HEIGHT;
    }
    let translation_top = y;
    if options.show_translation {
        y += block.translations.len() as f64 * TRANSLATION_HEIGHT;
    }
    let annotation_top = y;
    if options.show_annotations {
        y += block.annotations.len() as f64 * (ANNOTATION_HEIGHT + ANNOTATION_GAP);
    }
    let cut_site_top = y;
    if options.show_cut_sites {
        y += block.cut_sites.len() as f64 * CUT_SITE_ROW_HEIGHT;
    }
    let sequence_top = y;
    y += options.line_height;
    let complement_top = if has_complement && options.show_complement {
        let top = y;
        y += options.line_height;
        Some(top)
    } else {
        None
    };
    BlockLayout {
        translation_top,
        annotation_top,
        cut_site_top,
        sequence_top,
        complement_top,
        height: y + BLOCK_GAP,
    }
}

/// Rendered height of `block`, for scroll bookkeeping.
pub fn block_height(block: &Block, options: &LinearOptions, has_complement: bool) -> f64 {
    layout_block(block, options, has_complement).height
}

/// Ruler tick spacing for a line of `bases_per_line` bases.
pub fn tick_spacing(bases_per_line: usize) -> usize {
    ((bases_per_line as f64 / 10.0).round() as usize).max(1)
}

struct BlockPainter<'a> {
    scene: &'a LinearScene<'a>,
    options: &'a LinearOptions,
    block: &'a Block,
    layout: BlockLayout,
    group: Group,
    elements: Vec<MountedElement>,
}

impl<'a> BlockPainter<'a> {
    fn x(&self, offset: usize) -> f64 {
        MARGIN_LEFT + offset as f64 * self.options.char_width
    }

    fn x_abs(&self, index: usize) -> f64 {
        self.x(index - self.block.start)
    }

    fn seq_len(&self) -> usize {
        self.scene.seq.len()
    }

    fn add<T: Into<Box<dyn svg::Node>>>(&mut self, node: T) {
        let group = std::mem::replace(&mut self.group, Group::new());
        self.group = group.add(node);
    }

    fn mount(&mut self, id: String, kind: ElementKind, range: Range, left: f64, width: f64) {
        self.elements.push(MountedElement {
            id,
            meta: ElementMeta::new(kind, range, ViewMode::Linear)
                .with_geometry(ElementGeometry::Linear { left, width }),
        });
    }

    fn element_id(&self, feature_id: &str) -> String {
        format!("{feature_id}@{}", self.block.id)
    }

    fn paint_index(&mut self) {
        let tick = tick_spacing(self.options.bases_per_line);
        let cw = self.options.char_width;
        for index in self.block.start..self.block.end {
            if index != self.block.start && (index + 1) % tick != 0 {
                continue;
            }
            let x = self.x_abs(index) + cw / 2.0;
            self.add(
                Line::new()
                    .set("x1", x)
                    .set("y1", INDEX_HEIGHT - 6.0)
                    .set("x2", x)
                    .set("y2", INDEX_HEIGHT - 1.0)
                    .set("stroke", INDEX_COLOR)
                    .set("stroke-width", 1),
            );
            self.add(
                Text::new(DisplayPosition::from_index(index).to_string())
                    .set("x", x)
                    .set("y", INDEX_HEIGHT - 8.0)
                    .set("text-anchor", "middle")
                    .set("font-family", FONT_FAMILY)
                    .set("font-size", 9)
                    .set("fill", INDEX_COLOR),
            );
        }
    }

    fn paint_translations(&mut self) {
        let cw = self.options.char_width;
        let block = self.block;
        for (row_index, row) in block.translations.iter().enumerate() {
            let y = self.layout.translation_top + row_index as f64 * TRANSLATION_HEIGHT;
            for fragment in row {
                let translation = &fragment.item;
                let window = self.block.start + fragment.start..self.block.start + fragment.end;
                let frame = ReadingFrame::new(translation.range(), self.seq_len());
                for codon in frame.codons_in(self.scene.seq.as_bytes(), window.clone()) {
                    let color = amino_acid_color(codon.class);
                    for position in codon.positions.iter().filter(|p| window.contains(*p)) {
                        self.add(
                            Rectangle::new()
                                .set("x", self.x_abs(*position))
                                .set("y", y + 1.0)
                                .set("width", cw)
                                .set("height", TRANSLATION_HEIGHT - 2.0)
                                .set("fill", color),
                        );
                    }
                    if window.contains(&codon.middle()) {
                        self.add(
                            Text::new((codon.amino_acid as char).to_string())
                                .set("x", self.x_abs(codon.middle()) + cw / 2.0)
                                .set("y", y + TRANSLATION_HEIGHT - 4.0)
                                .set("text-anchor", "middle")
                                .set("font-family", FONT_FAMILY)
                                .set("font-size", LABEL_FONT_SIZE)
                                .set("fill", TEXT_COLOR),
                        );
                    }
                }
                let left = self.x(fragment.start);
                let width = fragment.width() as f64 * cw;
                let id = self.element_id(&translation.id);
                self.add(
                    Rectangle::new()
                        .set("id", id.clone())
                        .set("x", left)
                        .set("y", y)
                        .set("width", width)
                        .set("height", TRANSLATION_HEIGHT)
                        .set("fill", "transparent"),
                );
                self.mount(id, ElementKind::Translation, translation.range(), left, width);
            }
        }
    }

    fn paint_annotation(&mut self, fragment: &Fragment<Arc<Annotation>>, y: f64) {
        let annotation = &fragment.item;
        let cw = self.options.char_width;
        let left = self.x(fragment.start);
        let width = (fragment.width() as f64 * cw).max(2.0);
        let right = left + width;
        let bottom = y + ANNOTATION_HEIGHT;
        let id = self.element_id(&annotation.id);

        let arrow_right = annotation.direction == Direction::Forward && !fragment.continues_right;
        let arrow_left = annotation.direction == Direction::Reverse && !fragment.continues_left;
        let arrow = ARROW_WIDTH.min(width / 2.0);
        let body_left = if arrow_left { left + arrow } else { left };
        let body_right = if arrow_right { right - arrow } else { right };

        let mut data = Data::new()
            .move_to((body_left as f32, y as f32))
            .line_to((body_right as f32, y as f32));
        if arrow_right {
            data = data.line_to((right as f32, (y + ANNOTATION_HEIGHT / 2.0) as f32));
        }
        data = data.line_to((body_right as f32, bottom as f32)).line_to((body_left as f32, bottom as f32));
        if arrow_left {
            data = data.line_to((left as f32, (y + ANNOTATION_HEIGHT / 2.0) as f32));
        }
        self.add(
            Path::new()
                .set("id", id.clone())
                .set("d", data.close())
                .set("fill", annotation.color.as_str())
                .set("stroke", "#555555")
                .set("stroke-width", 0.5),
        );

        let label = truncate_label(&annotation.name);
        if !label.trim().is_empty() && estimate_text_width(&label, LABEL_FONT_SIZE) + 4.0 < width {
            self.add(
                Text::new(label)
                    .set("x", (left + right) / 2.0)
                    .set("y", bottom - 3.5)
                    .set("text-anchor", "middle")
                    .set("font-family", FONT_FAMILY)
                    .set("font-size", LABEL_FONT_SIZE)
                    .set("fill", TEXT_COLOR)
                    .set("pointer-events", "none"),
            );
        }
        self.mount(id, ElementKind::Annotation, annotation.range(), left, width);
    }

    fn paint_annotations(&mut self) {
        let block = self.block;
        for (row_index, row) in block.annotations.iter().enumerate() {
            let y = self.layout.annotation_top
                + row_index as f64 * (ANNOTATION_HEIGHT + ANNOTATION_GAP)
                + ANNOTATION_GAP;
            for fragment in row {
                self.paint_annotation(fragment, y);
            }
        }
    }

    /// Whether a cut between bases at `index` is drawn in this block.
    fn shows_cut(&self, index: usize) -> bool {
        self.block.start <= index
            && (index < self.block.end || (index == self.block.end && self.block.end == self.seq_len()))
    }

    fn paint_cut_site(&mut self, fragment: &Fragment<Arc<CutSite>>, y: f64) {
        let site = &fragment.item;
        let color = site.enzyme.color.clone().unwrap_or_else(|| CUT_SITE_COLOR.to_string());
        let seq_top = self.layout.sequence_top;
        let seq_bottom = seq_top + self.options.line_height;
        let strand_bottom = self.layout.complement_top.map(|top| top + self.options.line_height);
        let id = self.element_id(&site.id);

        let label_x = if self.shows_cut(site.fcut) {
            self.x_abs(site.fcut)
        } else {
            self.x(fragment.start)
        };
        self.add(
            Text::new(site.enzyme.name.clone())
                .set("x", label_x)
                .set("y", y + CUT_SITE_ROW_HEIGHT - 3.0)
                .set("text-anchor", "middle")
                .set("font-family", FONT_FAMILY)
                .set("font-size", 9)
                .set("fill", color.as_str()),
        );

        if self.shows_cut(site.fcut) {
            let x = self.x_abs(site.fcut);
            self.add(
                Line::new()
                    .set("x1", x)
                    .set("y1", y + CUT_SITE_ROW_HEIGHT)
                    .set("x2", x)
                    .set("y2", seq_bottom)
                    .set("stroke", color.as_str())
                    .set("stroke-width", 1),
            );
        }
        if let Some(strand_bottom) = strand_bottom {
            if self.shows_cut(site.rcut) {
                let x = self.x_abs(site.rcut);
                self.add(
                    Line::new()
                        .set("x1", x)
                        .set("y1", seq_bottom)
                        .set("x2", x)
                        .set("y2", strand_bottom)
                        .set("stroke", color.as_str())
                        .set("stroke-width", 1),
                );
            }
            let from = site.fcut.min(site.rcut).max(self.block.start);
            let to = site.fcut.max(site.rcut).min(self.block.end);
            if from < to {
                self.add(
                    Line::new()
                        .set("x1", self.x_abs(from))
                        .set("y1", seq_bottom)
                        .set("x2", self.x_abs(to))
                        .set("y2", seq_bottom)
                        .set("stroke", color.as_str())
                        .set("stroke-width", 1),
                );
            }
        }

        let left = self.x(fragment.start) - CUT_HIT_WIDTH / 2.0;
        let width = fragment.width() as f64 * self.options.char_width + CUT_HIT_WIDTH;
        self.add(
            Rectangle::new()
                .set("id", id.clone())
                .set("x", left)
                .set("y", y)
                .set("width", width)
                .set("height", seq_bottom - y)
                .set("fill", "transparent"),
        );
        self.mount(id, ElementKind::CutSite, site.range(), left, width);
    }

    fn paint_cut_sites(&mut self) {
        let block = self.block;
        for (row_index, row) in block.cut_sites.iter().enumerate() {
            let y = self.layout.cut_site_top + row_index as f64 * CUT_SITE_ROW_HEIGHT;
            for fragment in row {
                self.paint_cut_site(fragment, y);
            }
        }
    }

    fn paint_region(&mut self, id: String, kind: ElementKind, range: Range, start: usize, end: usize, color: &str) {
        let cw = self.options.char_width;
        let left = self.x(start);
        let width = ((end - start) as f64 * cw).max(1.0);
        let top = match (range.direction, self.layout.complement_top) {
            (Direction::Reverse, Some(top)) => top,
            _ => self.layout.sequence_top,
        };
        self.add(
            Rectangle::new()
                .set("id", id.clone())
                .set("x", left)
                .set("y", top)
                .set("width", width)
                .set("height", self.options.line_height)
                .set("fill", color)
                .set("fill-opacity", 0.6),
        );
        self.mount(id, kind, range, left, width);
    }

    fn paint_search_and_highlights(&mut self) {
        let block = self.block;
        for fragment in block.highlights.iter().flatten() {
            let highlight = &fragment.item;
            let color = highlight.color.as_deref().unwrap_or(DEFAULT_HIGHLIGHT_COLOR);
            let id = self.element_id(&highlight.id);
            self.paint_region(id, ElementKind::Highlight, highlight.range(), fragment.start, fragment.end, color);
        }
        for fragment in block.search_matches.iter().flatten() {
            let hit = &fragment.item;
            let id = self.element_id(&hit.id);
            self.paint_region(id, ElementKind::Find, hit.range(), fragment.start, fragment.end, &hit.color);
        }
    }

    fn paint_selection(&mut self, selection: Selection) {
        let top = self.layout.sequence_top;
        let bottom = self
            .layout
            .complement_top
            .unwrap_or(top)
            + self.options.line_height;
        if selection.is_cursor() {
            if self.shows_cut(selection.start) {
                let x = self.x_abs(selection.start);
                self.add(
                    Line::new()
                        .set("x1", x)
                        .set("y1", top)
                        .set("x2", x)
                        .set("y2", bottom)
                        .set("stroke", SELECTION_EDGE_COLOR)
                        .set("stroke-width", 1.5),
                );
            }
            return;
        }
        let range = selection.as_range();
        for segment in range.segments(self.seq_len()) {
            let from = segment.start.max(self.block.start);
            let to = segment.end.min(self.block.end);
            if from >= to {
                continue;
            }
            self.add(
                Rectangle::new()
                    .set("x", self.x_abs(from))
                    .set("y", top)
                    .set("width", (to - from) as f64 * self.options.char_width)
                    .set("height", bottom - top)
                    .set("fill", SELECTION_COLOR)
                    .set("stroke", SELECTION_EDGE_COLOR)
                    .set("stroke-width", 0.5),
            );
        }
    }

    fn paint_strand(&mut self, strand: &str, top: f64, opacity: f64) {
        let cw = self.options.char_width;
        let bytes = strand.as_bytes();
        let nucleotide = self.scene.seq_type.is_nucleotide();
        let end = self.block.end.min(bytes.len());
        for index in self.block.start..end {
            let letter = bytes[index];
            let color = if nucleotide {
                base_color(letter)
            } else if self.scene.seq_type == SequenceType::Aa {
                amino_acid_color(AminoAcidClass::of(letter))
            } else {
                TEXT_COLOR
            };
            let text = Text::new((letter as char).to_string())
                .set("x", self.x_abs(index) + cw / 2.0)
                .set("y", top + self.options.line_height - 4.0)
                .set("text-anchor", "middle")
                .set("font-family", FONT_FAMILY)
                .set("font-size", (cw * 1.6).min(self.options.line_height - 2.0))
                .set("fill", color)
                .set("pointer-events", "none");
            if opacity < 1.0 {
                self.add(text.set("fill-opacity", opacity));
            } else {
                self.add(text);
            }
        }
    }

    fn paint_end_labels(&mut self, top: f64, left: &str, right: &str) {
        let y = top + self.options.line_height - 4.0;
        let right_x = self.x(self.block.len()) + 4.0;
        for (label, x, anchor) in [(left, MARGIN_LEFT - 4.0, "end"), (right, right_x, "start")] {
            self.add(
                Text::new(label)
                    .set("x", x)
                    .set("y", y)
                    .set("text-anchor", anchor)
                    .set("font-family", FONT_FAMILY)
                    .set("font-size", 9)
                    .set("fill", MUTED_TEXT_COLOR),
            );
        }
    }

    fn paint_sequence(&mut self) {
        let top = self.layout.sequence_top;
        let left = MARGIN_LEFT;
        let width = self.block.len() as f64 * self.options.char_width;
        let strand_height = self
            .layout
            .complement_top
            .map_or(self.options.line_height, |c| c - top + self.options.line_height);

        let seq = self.scene.seq;
        self.paint_strand(seq, top, 1.0);
        let labeled = self.scene.seq_type.is_nucleotide();
        if labeled {
            self.paint_end_labels(top, "5′", "3′");
        }
        if let Some(complement_top) = self.layout.complement_top {
            let complement = self.scene.complement;
            self.paint_strand(complement, complement_top, 0.5);
            self.paint_end_labels(complement_top, "3′", "5′");
        }

        let block_id = self.block.id.clone();
        self.add(
            Rectangle::new()
                .set("id", block_id.clone())
                .set("x", left)
                .set("y", top)
                .set("width", width)
                .set("height", strand_height)
                .set("fill", "transparent"),
        );
        let range = Range::new(self.block.start, self.block.end);
        self.mount(block_id, ElementKind::Seq, range, left, width);
    }

    fn paint(mut self) -> (Group, Vec<MountedElement>) {
        if self.options.show_index {
            self.paint_index();
        }
        if self.options.show_translation {
            self.paint_translations();
        }
        if self.options.show_annotations {
            self.paint_annotations();
        }
        if let Some(selection) = self.scene.selection {
            self.paint_selection(selection);
        }
        self.paint_search_and_highlights();
        if self.options.show_cut_sites {
            self.paint_cut_sites();
        }
        self.paint_sequence();
        (self.group, self.elements)
    }
}

/// Renders `scene.blocks` top to bottom. The caller picks which blocks to
/// pass, so only the visible part of a long sequence is drawn.
pub fn render_linear(scene: &LinearScene, options: &LinearOptions) -> RenderedView {
    let has_complement = !scene.complement.is_empty();
    let mut groups = vec![];
    let mut elements = vec![];
    let mut y = 0.0;
    for block in scene.blocks {
        let layout = layout_block(block, options, has_complement);
        let painter = BlockPainter {
            scene,
            options,
            block,
            layout,
            group: Group::new()
                .set("class", "seqview-block")
                .set("transform", format!("translate(0,{y})")),
            elements: vec![],
        };
        let (group, mounted) = painter.paint();
        groups.push(group);
        elements.extend(mounted);
        y += layout.height;
    }

    let height = y.max(1.0);
    let mut doc = Document::new()
        .set("viewBox", (0, 0, options.width, height))
        .set("width", options.width)
        .set("height", height)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", options.width)
                .set("height", height)
                .set("fill", "#ffffff"),
        );
    for group in groups {
        doc = doc.add(group);
    }
    log::debug!("linear view: {} elements, {height:.0} units tall", elements.len());
    RenderedView {
        svg: doc.to_string(),
        elements,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqview_engine::{FeatureSet, LayoutRows, complement, fragment};
    use seqview_protocol::{CutSite, SearchMatch, Translation};

    fn scene_blocks(seq: &str, features: &FeatureSet, width: usize) -> Vec<Block> {
        let rows = LayoutRows::pack(features, seq.len());
        fragment(&rows, seq.len(), width)
    }

    /// Contents of every `<text>` node, whatever whitespace the writer puts
    /// around them.
    fn text_contents(svg: &str) -> Vec<&str> {
        svg.split("</text>")
            .filter_map(|chunk| chunk.rsplit_once('>').map(|(_, text)| text.trim()))
            .collect()
    }

    fn options(bases_per_line: usize) -> LinearOptions {
        LinearOptions {
            bases_per_line,
            ..Default::default()
        }
    }

    #[test]
    fn tick_spacing_follows_line_width() {
        assert_eq!(tick_spacing(100), 10);
        assert_eq!(tick_spacing(4), 1);
        assert_eq!(tick_spacing(25), 3);
    }

    #[test]
    fn renders_bases_ruler_and_registers_blocks() {
        let seq = "ATGC".repeat(10);
        let comp = complement(&seq, SequenceType::Dna);
        let blocks = scene_blocks(&seq, &FeatureSet::default(), 20);
        let scene = LinearScene {
            seq: &seq,
            complement: &comp,
            seq_type: SequenceType::Dna,
            blocks: &blocks,
            selection: None,
        };
        let view = render_linear(&scene, &options(20));
        assert!(text_contents(&view.svg).contains(&"21"));
        assert!(view.svg.contains("5′"));
        assert!(view.svg.contains(base_color(b'A')));
        let seq_elements: Vec<_> = view
            .elements
            .iter()
            .filter(|e| e.meta.kind == ElementKind::Seq)
            .collect();
        assert_eq!(seq_elements.len(), 2);
        assert_eq!(seq_elements[1].id, "block-1");
        assert_eq!(seq_elements[1].meta.range, Range::new(20, 40));
        assert!(view.height > 0.0);
    }

    #[test]
    fn annotations_split_across_blocks_share_their_range() {
        let seq = "A".repeat(60);
        let features = FeatureSet {
            annotations: vec![Arc::new(Annotation::new("a1", "ampR", 10, 50, Direction::Reverse))],
            ..Default::default()
        };
        let blocks = scene_blocks(&seq, &features, 20);
        let scene = LinearScene {
            seq: &seq,
            complement: "",
            seq_type: SequenceType::Dna,
            blocks: &blocks,
            selection: None,
        };
        let view = render_linear(&scene, &options(20));
        let ids: Vec<_> = view
            .elements
            .iter()
            .filter(|e| e.meta.kind == ElementKind::Annotation)
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a1@block-0", "a1@block-1", "a1@block-2"]);
        for element in view.elements.iter().filter(|e| e.meta.kind == ElementKind::Annotation) {
            assert_eq!(element.meta.range.start, 10);
            assert_eq!(element.meta.range.end, 50);
            assert_eq!(element.meta.range.direction, Direction::Reverse);
        }
        assert!(view.svg.contains("ampR"));
    }

    #[test]
    fn long_labels_are_truncated_and_narrow_ones_dropped() {
        let seq = "A".repeat(200);
        let features = FeatureSet {
            annotations: vec![
                Arc::new(Annotation::new("wide", "a very long annotation name", 0, 150, Direction::Forward)),
                Arc::new(Annotation::new("narrow", "tiny-label", 160, 162, Direction::Forward)),
            ],
            ..Default::default()
        };
        let blocks = scene_blocks(&seq, &features, 200);
        let scene = LinearScene {
            seq: &seq,
            complement: "",
            seq_type: SequenceType::Dna,
            blocks: &blocks,
            selection: None,
        };
        let view = render_linear(&scene, &LinearOptions { width: 1600.0, ..options(200) });
        assert!(view.svg.contains("a very long …"));
        assert!(!view.svg.contains("tiny-label"));
    }

    #[test]
    fn cut_sites_search_hits_and_translations_register() {
        let seq = "ATGGAATTCAAATAA".to_string();
        let comp = complement(&seq, SequenceType::Dna);
        let features = FeatureSet {
            cut_sites: vec![Arc::new(CutSite::new("ecori", "EcoRI", 3, 9, 4, 8))],
            search_matches: vec![Arc::new(SearchMatch {
                id: "search-0-fwd".to_string(),
                name: "ATG".to_string(),
                color: "#FBF719".to_string(),
                start: 0,
                end: 3,
                direction: Direction::Forward,
            })],
            translations: vec![Arc::new(Translation {
                id: "orf".to_string(),
                start: 0,
                end: 15,
                direction: Direction::Forward,
            })],
            ..Default::default()
        };
        let blocks = scene_blocks(&seq, &features, 15);
        let scene = LinearScene {
            seq: &seq,
            complement: &comp,
            seq_type: SequenceType::Dna,
            blocks: &blocks,
            selection: Some(Selection::new(3, 9, true)),
        };
        let view = render_linear(&scene, &options(15));
        let kinds: Vec<_> = view.elements.iter().map(|e| e.meta.kind).collect();
        assert!(kinds.contains(&ElementKind::CutSite));
        assert!(kinds.contains(&ElementKind::Find));
        assert!(kinds.contains(&ElementKind::Translation));
        assert!(view.svg.contains("EcoRI"));
        let texts = text_contents(&view.svg);
        assert!(texts.contains(&"M"));
        assert!(texts.contains(&"*"));
        assert!(view.svg.contains(SELECTION_COLOR));
    }

    #[test]
    fn hidden_tracks_are_not_drawn() {
        let seq = "ATGC".repeat(5);
        let features = FeatureSet {
            annotations: vec![Arc::new(Annotation::new("a", "gene", 0, 10, Direction::Forward))],
            ..Default::default()
        };
        let blocks = scene_blocks(&seq, &features, 20);
        let scene = LinearScene {
            seq: &seq,
            complement: "",
            seq_type: SequenceType::Dna,
            blocks: &blocks,
            selection: None,
        };
        let shown = render_linear(&scene, &options(20));
        let hidden = render_linear(
            &scene,
            &LinearOptions {
                show_annotations: false,
                show_index: false,
                ..options(20)
            },
        );
        assert!(hidden.height < shown.height);
        assert!(hidden.elements.iter().all(|e| e.meta.kind != ElementKind::Annotation));
    }
}
