//! Circular plasmid map. Works on the packed rows directly: an arc is never
//! split, it just runs round the circle.

use crate::RenderedView;
use crate::elements::{ElementGeometry, ElementKind, ElementMeta, MountedElement};
use crate::style::{
    CUT_SITE_COLOR, FONT_FAMILY, INDEX_COLOR, MUTED_TEXT_COLOR, SELECTION_COLOR,
    SELECTION_EDGE_COLOR, TEXT_COLOR, base_color, estimate_text_width, truncate_label,
};
use seqview_engine::{CircularFrame, LayoutRows, Point};
use seqview_protocol::{
    DEFAULT_HIGHLIGHT_COLOR, Direction, DisplayPosition, Range, Ranged, Selection, SequenceType,
    ViewMode,
};
use std::f64::consts::{PI, TAU};
use svg::Document;
use svg::node::element::{Circle, Group, Line, Path, Rectangle, Text};

/// Longest sequence whose individual bases are drawn round the map.
pub const BASEPAIR_RING_LIMIT: usize = 250;

/// Ticks further than this many increments from the central index are
/// skipped.
pub const TICK_WINDOW: usize = 6;

pub const SEQ_ELEMENT_ID: &str = "circular-seq";

const ANNOTATION_HEIGHT: f64 = 14.0;
const ANNOTATION_GAP: f64 = 3.0;
const TICK_LENGTH: f64 = 6.0;
const CUT_SITE_ROW_HEIGHT: f64 = 12.0;
const NAME_FONT_SIZE: f64 = 16.0;
const LENGTH_FONT_SIZE: f64 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CircularOptions {
    pub width: f64,
    pub height: f64,
    /// 0 shows the whole map; higher values tighten the tick spacing.
    pub zoom: u8,
    pub show_index: bool,
    pub show_annotations: bool,
    pub show_cut_sites: bool,
}

impl Default for CircularOptions {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
            zoom: 0,
            show_index: true,
            show_annotations: true,
            show_cut_sites: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CircularScene<'a> {
    pub name: &'a str,
    pub seq: &'a str,
    pub seq_type: SequenceType,
    pub rows: &'a LayoutRows,
    pub central_index: usize,
    pub selection: Option<Selection>,
    /// Free-floating notice drawn in a corner, outside the rotated map.
    pub overlay: Option<&'a str>,
}

fn nice_number(raw: f64) -> usize {
    if raw <= 1.0 {
        return 1;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    for step in [1.0, 2.0, 5.0, 10.0] {
        if step * magnitude >= raw {
            return (step * magnitude) as usize;
        }
    }
    (10.0 * magnitude) as usize
}

/// Tick spacing giving roughly six ticks over the visible part of the map.
pub fn tick_increment(seq_len: usize, zoom: u8) -> usize {
    let scale = 1.0 + f64::from(zoom) / 10.0;
    nice_number(seq_len as f64 / (6.0 * scale))
}

fn circular_distance(a: usize, b: usize, seq_len: usize) -> usize {
    let d = a.abs_diff(b);
    d.min(seq_len - d)
}

/// Tick indices near `central_index`: the origin plus every base whose
/// 1-based position is a multiple of `increment`.
pub fn visible_ticks(seq_len: usize, central_index: usize, increment: usize) -> Vec<usize> {
    if seq_len == 0 || increment == 0 {
        return vec![];
    }
    let reach = increment.saturating_mul(TICK_WINDOW);
    std::iter::once(0)
        .chain((1..=seq_len / increment).map(|m| m * increment - 1))
        .filter(|index| *index < seq_len)
        .filter(|index| circular_distance(*index, central_index % seq_len, seq_len) <= reach)
        .collect()
}

fn fmt_point(p: Point) -> String {
    format!("{:.3} {:.3}", p.x, p.y)
}

fn arc_to(radius: f64, large: bool, clockwise: bool, to: Point) -> String {
    format!(
        "A {radius:.3} {radius:.3} 0 {} {} {}",
        u8::from(large),
        u8::from(clockwise),
        fmt_point(to)
    )
}

/// SVG path of an annular sector between `inner` and `outer`, starting at
/// `start` and covering `length` bases clockwise. Directed sectors end in an
/// arrow; a sector covering the whole circle is drawn as two halves.
pub fn gen_arc(
    frame: &CircularFrame,
    inner: f64,
    outer: f64,
    start: f64,
    length: f64,
    direction: Direction,
) -> String {
    let theta1 = frame.angle(start);
    let sweep = frame.sweep(length);
    let p = |theta: f64, radius: f64| frame.point_at_angle(theta, radius);

    if sweep <= 0.0 {
        return format!("M {} L {}", fmt_point(p(theta1, inner)), fmt_point(p(theta1, outer)));
    }
    if sweep >= TAU {
        let half = theta1 + PI;
        let end = theta1 + TAU;
        return [
            format!("M {}", fmt_point(p(theta1, outer))),
            arc_to(outer, false, true, p(half, outer)),
            arc_to(outer, false, true, p(end, outer)),
            format!("L {}", fmt_point(p(end, inner))),
            arc_to(inner, false, false, p(half, inner)),
            arc_to(inner, false, false, p(theta1, inner)),
            "Z".to_string(),
        ]
        .join(" ");
    }

    let theta2 = theta1 + sweep;
    let middle = (inner + outer) / 2.0;
    let arrow = if direction == Direction::None || middle <= 0.0 {
        0.0
    } else {
        ((outer - inner) * 0.6 / middle).min(sweep / 2.0)
    };
    let (body_start, body_end) = match direction {
        Direction::Forward => (theta1, theta2 - arrow),
        Direction::Reverse => (theta1 + arrow, theta2),
        Direction::None => (theta1, theta2),
    };
    let large = body_end - body_start > PI;

    let mut parts = vec![
        format!("M {}", fmt_point(p(body_start, outer))),
        arc_to(outer, large, true, p(body_end, outer)),
    ];
    if direction == Direction::Forward {
        parts.push(format!("L {}", fmt_point(p(theta2, middle))));
    }
    parts.push(format!("L {}", fmt_point(p(body_end, inner))));
    parts.push(arc_to(inner, large, false, p(body_start, inner)));
    if direction == Direction::Reverse {
        parts.push(format!("L {}", fmt_point(p(theta1, middle))));
    }
    parts.push("Z".to_string());
    parts.join(" ")
}

/// Radii of the map, all measured from the centre.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Radii {
    index: f64,
    basepairs: Option<f64>,
    annotation_top: f64,
    annotation_row: f64,
    innermost: f64,
}

fn radii(scene: &CircularScene, options: &CircularOptions) -> Radii {
    let index = options.width.min(options.height) / 2.0 * 0.72;
    let seq_len = scene.seq.len();
    let basepairs = (seq_len > 0 && seq_len <= BASEPAIR_RING_LIMIT).then_some(index - 10.0);
    let annotation_top = index - if basepairs.is_some() { 22.0 } else { 8.0 };
    let rows = if options.show_annotations {
        scene.rows.annotations.len()
    } else {
        0
    };
    let pitch = ANNOTATION_HEIGHT + ANNOTATION_GAP;
    let annotation_row = if rows == 0 {
        pitch
    } else {
        pitch.min(annotation_top * 0.7 / rows as f64)
    };
    let innermost = if rows == 0 {
        basepairs.map_or(index, |r| r - 8.0)
    } else {
        annotation_top - rows as f64 * annotation_row
    };
    Radii {
        index,
        basepairs,
        annotation_top,
        annotation_row,
        innermost,
    }
}

struct MapPainter<'a> {
    scene: &'a CircularScene<'a>,
    options: &'a CircularOptions,
    frame: CircularFrame,
    radii: Radii,
    group: Group,
    elements: Vec<MountedElement>,
}

impl<'a> MapPainter<'a> {
    fn seq_len(&self) -> usize {
        self.scene.seq.len()
    }

    fn add<T: Into<Box<dyn svg::Node>>>(&mut self, node: T) {
        let group = std::mem::replace(&mut self.group, Group::new());
        self.group = group.add(node);
    }

    fn mount(&mut self, id: &str, kind: ElementKind, range: Range) {
        self.elements.push(MountedElement {
            id: id.to_string(),
            meta: ElementMeta::new(kind, range, ViewMode::Circular)
                .with_geometry(ElementGeometry::Circular(self.frame)),
        });
    }

    fn arc(&self, inner: f64, outer: f64, range: &Range) -> String {
        let length = range.span(self.seq_len()) as f64;
        gen_arc(&self.frame, inner, outer, range.start as f64, length, range.direction)
    }

    fn paint_index(&mut self) {
        let r = self.radii.index;
        let increment = tick_increment(self.seq_len(), self.options.zoom);
        for index in visible_ticks(self.seq_len(), self.frame.central_index, increment) {
            let position = index as f64 + 0.5;
            let from = self.frame.to_polar(position, r);
            let to = self.frame.to_polar(position, r + TICK_LENGTH);
            let label = self.frame.to_polar(position, r + TICK_LENGTH + 10.0);
            self.add(
                Line::new()
                    .set("x1", from.x)
                    .set("y1", from.y)
                    .set("x2", to.x)
                    .set("y2", to.y)
                    .set("stroke", INDEX_COLOR)
                    .set("stroke-width", 1),
            );
            self.add(
                Text::new(DisplayPosition::from_index(index).to_string())
                    .set("x", label.x)
                    .set("y", label.y + 3.0)
                    .set("text-anchor", "middle")
                    .set("font-family", FONT_FAMILY)
                    .set("font-size", 9)
                    .set("fill", INDEX_COLOR),
            );
        }
    }

    fn paint_basepairs(&mut self, radius: f64) {
        let bytes = self.scene.seq.as_bytes();
        let nucleotide = self.scene.seq_type.is_nucleotide();
        for (index, letter) in bytes.iter().enumerate() {
            let at = self.frame.to_polar(index as f64 + 0.5, radius);
            let color = if nucleotide { base_color(*letter) } else { TEXT_COLOR };
            self.add(
                Text::new((*letter as char).to_string())
                    .set("x", at.x)
                    .set("y", at.y + 3.0)
                    .set("text-anchor", "middle")
                    .set("font-family", FONT_FAMILY)
                    .set("font-size", 9)
                    .set("fill", color)
                    .set("pointer-events", "none"),
            );
        }
    }

    fn paint_regions(&mut self) {
        let r = self.radii.index;
        let rows = self.scene.rows;
        for highlight in rows.highlights.iter().flatten() {
            let color = highlight.color.as_deref().unwrap_or(DEFAULT_HIGHLIGHT_COLOR);
            let d = self.arc(r - 4.0, r + 4.0, &highlight.range());
            self.add(
                Path::new()
                    .set("id", highlight.id.as_str())
                    .set("d", d)
                    .set("fill", color)
                    .set("fill-opacity", 0.6),
            );
            self.mount(&highlight.id, ElementKind::Highlight, highlight.range());
        }
        for hit in rows.search_matches.iter().flatten() {
            let range = hit.range();
            let d = self.arc(r - 4.0, r + 4.0, &Range::new(range.start, range.end));
            self.add(
                Path::new()
                    .set("id", hit.id.as_str())
                    .set("d", d)
                    .set("fill", hit.color.as_str())
                    .set("fill-opacity", 0.6),
            );
            self.mount(&hit.id, ElementKind::Find, range);
        }
    }

    fn paint_cut_sites(&mut self) {
        let r = self.radii.index;
        let rows = self.scene.rows;
        for (row_index, row) in rows.cut_sites.iter().enumerate() {
            let label_radius = r + TICK_LENGTH + 22.0 + row_index as f64 * CUT_SITE_ROW_HEIGHT;
            for site in row {
                let color = site.enzyme.color.as_deref().unwrap_or(CUT_SITE_COLOR);
                let at = site.fcut as f64;
                let from = self.frame.to_polar(at, r);
                let to = self.frame.to_polar(at, label_radius - 8.0);
                let label = self.frame.to_polar(at, label_radius);
                let anchor = if label.x >= self.frame.center.x { "start" } else { "end" };
                self.add(
                    Line::new()
                        .set("x1", from.x)
                        .set("y1", from.y)
                        .set("x2", to.x)
                        .set("y2", to.y)
                        .set("stroke", color)
                        .set("stroke-width", 1),
                );
                self.add(
                    Text::new(site.enzyme.name.clone())
                        .set("id", site.id.as_str())
                        .set("x", label.x)
                        .set("y", label.y + 3.0)
                        .set("text-anchor", anchor)
                        .set("font-family", FONT_FAMILY)
                        .set("font-size", 9)
                        .set("fill", color),
                );
                self.mount(&site.id, ElementKind::CutSite, site.range());
            }
        }
    }

    fn paint_annotations(&mut self) {
        let rows = self.scene.rows;
        for (row_index, row) in rows.annotations.iter().enumerate() {
            let outer = self.radii.annotation_top - row_index as f64 * self.radii.annotation_row;
            let inner = outer - (self.radii.annotation_row - ANNOTATION_GAP).max(2.0);
            for annotation in row {
                let range = annotation.range();
                let d = self.arc(inner, outer, &range);
                self.add(
                    Path::new()
                        .set("id", annotation.id.as_str())
                        .set("d", d)
                        .set("fill", annotation.color.as_str())
                        .set("stroke", "#555555")
                        .set("stroke-width", 0.5),
                );

                let label = truncate_label(&annotation.name);
                let middle_radius = (inner + outer) / 2.0;
                let arc_length = self.frame.sweep(range.span(self.seq_len()) as f64) * middle_radius;
                if !label.trim().is_empty() && estimate_text_width(&label, 10.0) + 6.0 < arc_length {
                    let middle = range.start as f64 + range.span(self.seq_len()) as f64 / 2.0;
                    let at = self.frame.to_polar(middle, middle_radius);
                    self.add(
                        Text::new(label)
                            .set("x", at.x)
                            .set("y", at.y + 3.5)
                            .set("text-anchor", "middle")
                            .set("font-family", FONT_FAMILY)
                            .set("font-size", 10)
                            .set("fill", TEXT_COLOR)
                            .set("pointer-events", "none"),
                    );
                }
                self.mount(&annotation.id, ElementKind::Annotation, range);
            }
        }
    }

    fn paint_selection(&mut self, selection: Selection) {
        let inner = self.radii.innermost;
        let outer = self.radii.index;
        if selection.is_cursor() {
            let from = self.frame.to_polar(selection.start as f64, inner);
            let to = self.frame.to_polar(selection.start as f64, outer);
            self.add(
                Line::new()
                    .set("x1", from.x)
                    .set("y1", from.y)
                    .set("x2", to.x)
                    .set("y2", to.y)
                    .set("stroke", SELECTION_EDGE_COLOR)
                    .set("stroke-width", 1.5),
            );
            return;
        }
        let range = selection.as_range();
        let d = gen_arc(
            &self.frame,
            inner,
            outer,
            range.start as f64,
            range.span(self.seq_len()) as f64,
            Direction::None,
        );
        self.add(
            Path::new()
                .set("d", d)
                .set("fill", SELECTION_COLOR)
                .set("fill-opacity", 0.7)
                .set("stroke", SELECTION_EDGE_COLOR)
                .set("stroke-width", 0.5),
        );
    }

    fn paint_index_circle(&mut self) {
        self.add(
            Circle::new()
                .set("id", SEQ_ELEMENT_ID)
                .set("cx", self.frame.center.x)
                .set("cy", self.frame.center.y)
                .set("r", self.radii.index)
                .set("fill", "none")
                .set("stroke", "#000000")
                .set("stroke-width", 1.5),
        );
        let range = Range::new(0, self.seq_len());
        self.mount(SEQ_ELEMENT_ID, ElementKind::Seq, range);
    }

    fn paint(mut self) -> (Group, Vec<MountedElement>) {
        if let Some(selection) = self.scene.selection {
            self.paint_selection(selection);
        }
        self.paint_index_circle();
        if self.options.show_index {
            self.paint_index();
        }
        if let Some(radius) = self.radii.basepairs {
            self.paint_basepairs(radius);
        }
        self.paint_regions();
        if self.options.show_cut_sites {
            self.paint_cut_sites();
        }
        if self.options.show_annotations {
            self.paint_annotations();
        }
        (self.group, self.elements)
    }
}

/// Whether the name label would collide with the innermost feature ring.
pub fn center_is_crowded(name: &str, innermost_radius: f64) -> bool {
    estimate_text_width(name, NAME_FONT_SIZE) / 2.0 + 8.0 > innermost_radius
}

pub fn render_circular(scene: &CircularScene, options: &CircularOptions) -> RenderedView {
    let center = Point::new(options.width / 2.0, options.height / 2.0);
    let seq_len = scene.seq.len();
    let frame = CircularFrame::new(center, seq_len, scene.central_index % seq_len.max(1));
    let radii = radii(scene, options);
    let painter = MapPainter {
        scene,
        options,
        frame,
        radii,
        group: Group::new().set("class", "seqview-map"),
        elements: vec![],
    };
    let (map, elements) = painter.paint();

    let mut doc = Document::new()
        .set("viewBox", (0, 0, options.width, options.height))
        .set("width", options.width)
        .set("height", options.height)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", options.width)
                .set("height", options.height)
                .set("fill", "#ffffff"),
        )
        .add(map);

    let (name_y, length_y) = if center_is_crowded(scene.name, radii.innermost) {
        (options.height - 26.0, options.height - 10.0)
    } else {
        (center.y - 2.0, center.y + 16.0)
    };
    doc = doc
        .add(
            Text::new(scene.name)
                .set("x", center.x)
                .set("y", name_y)
                .set("text-anchor", "middle")
                .set("font-family", FONT_FAMILY)
                .set("font-size", NAME_FONT_SIZE)
                .set("fill", TEXT_COLOR),
        )
        .add(
            Text::new(format!("{seq_len} bp"))
                .set("x", center.x)
                .set("y", length_y)
                .set("text-anchor", "middle")
                .set("font-family", FONT_FAMILY)
                .set("font-size", LENGTH_FONT_SIZE)
                .set("fill", MUTED_TEXT_COLOR),
        );

    if let Some(overlay) = scene.overlay {
        doc = doc.add(
            Text::new(overlay)
                .set("class", "seqview-overlay")
                .set("x", 12)
                .set("y", 20)
                .set("font-family", FONT_FAMILY)
                .set("font-size", 12)
                .set("fill", "#C92A2A"),
        );
    }

    log::debug!(
        "circular map of {} bp: {} elements, zoom {}",
        scene.seq.len(),
        elements.len(),
        options.zoom
    );
    RenderedView {
        svg: doc.to_string(),
        elements,
        height: options.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqview_engine::{FeatureSet, LayoutRows};
    use seqview_protocol::{Annotation, CutSite};
    use std::sync::Arc;

    fn scene<'a>(name: &'a str, seq: &'a str, rows: &'a LayoutRows) -> CircularScene<'a> {
        CircularScene {
            name,
            seq,
            seq_type: SequenceType::Dna,
            rows,
            central_index: 0,
            selection: None,
            overlay: None,
        }
    }

    #[test]
    fn tick_increment_is_a_round_number() {
        assert_eq!(tick_increment(2686, 0), 500);
        assert_eq!(tick_increment(6_000_000, 0), 1_000_000);
        assert_eq!(tick_increment(30, 0), 5);
        assert_eq!(tick_increment(3, 0), 1);
        assert!(tick_increment(2686, 100) < tick_increment(2686, 0));
    }

    #[test]
    fn ticks_are_limited_to_the_central_window() {
        let all = visible_ticks(2686, 0, 500);
        assert_eq!(all, vec![0, 499, 999, 1499, 1999, 2499]);
        let near = visible_ticks(1_000_000, 500_000, 10_000);
        assert!(near.iter().all(|t| t.abs_diff(500_000) <= 60_000));
        assert_eq!(near.len(), 12);
    }

    #[test]
    fn arc_flags() {
        let frame = CircularFrame::new(Point::new(100.0, 100.0), 100, 0);
        let short = gen_arc(&frame, 40.0, 50.0, 0.0, 10.0, Direction::None);
        assert!(short.starts_with("M 100.000 50.000 A 50.000 50.000 0 0 1"));
        let long = gen_arc(&frame, 40.0, 50.0, 0.0, 70.0, Direction::None);
        assert!(long.contains("A 50.000 50.000 0 1 1"));
        let full = gen_arc(&frame, 40.0, 50.0, 0.0, 100.0, Direction::None);
        assert_eq!(full.matches(" A ").count() + usize::from(full.starts_with("A")), 4);
        let forward = gen_arc(&frame, 40.0, 50.0, 0.0, 25.0, Direction::Forward);
        assert!(forward.contains("L 145.000 100.000"));
    }

    #[test]
    fn basepair_ring_has_a_hard_cutoff() {
        let rows = LayoutRows::default();
        let small = "ATGC".repeat(62) + "AT";
        let view = render_circular(&scene("small", &small, &rows), &CircularOptions::default());
        assert!(view.svg.matches("pointer-events=\"none\"").count() >= 250);

        let large = "ATGC".repeat(63);
        let view = render_circular(&scene("large", &large, &rows), &CircularOptions::default());
        assert_eq!(view.svg.matches("pointer-events=\"none\"").count(), 0);
    }

    #[test]
    fn annotations_and_cut_sites_register_with_full_ranges() {
        let seq = "ATGC".repeat(500);
        let features = FeatureSet {
            annotations: vec![Arc::new(Annotation::new("ori", "ori", 1900, 100, Direction::Forward))],
            cut_sites: vec![Arc::new(CutSite::new("ecori", "EcoRI", 396, 402, 397, 401))],
            ..Default::default()
        };
        let rows = LayoutRows::pack(&features, seq.len());
        let view = render_circular(&scene("pUC19", &seq, &rows), &CircularOptions::default());
        let ori = view.elements.iter().find(|e| e.id == "ori").unwrap();
        assert_eq!(ori.meta.kind, ElementKind::Annotation);
        assert_eq!((ori.meta.range.start, ori.meta.range.end), (1900, 100));
        assert!(view.elements.iter().any(|e| e.id == "ecori" && e.meta.kind == ElementKind::CutSite));
        assert!(view.elements.iter().any(|e| e.id == SEQ_ELEMENT_ID));
        assert!(view.svg.contains("2000 bp"));
        assert!(view.svg.contains("EcoRI"));
    }

    #[test]
    fn crowded_center_moves_the_title_down() {
        assert!(!center_is_crowded("pUC19", 150.0));
        assert!(center_is_crowded("an extremely long plasmid name", 60.0));
    }

    #[test]
    fn overlay_is_drawn_outside_the_map() {
        let rows = LayoutRows::default();
        let seq = "ATGC".repeat(100);
        let mut scene = scene("p", &seq, &rows);
        scene.overlay = Some("disease detected");
        scene.central_index = 150;
        let view = render_circular(&scene, &CircularOptions::default());
        let map_end = view.svg.find("</g>").unwrap();
        let overlay_at = view.svg.find("disease detected").unwrap();
        assert!(overlay_at > map_end);
    }
}
