//! The viewer: owns the sequence, its features and the view state, decides
//! when work happens and feeds the renderers.
//!
//! Time is passed in by the caller (`now_ms`) and delayed work only happens in
//! [`SequenceViewer::poll`], so a host event loop stays in charge of when the
//! expensive steps run.

use crate::clipboard::{ClipboardService, CopyOutcome};
use crate::config::ViewerConfig;
use crate::dna_display::{DisplayFeature, DnaDisplay, FeatureStatus, SizeClass};
use crate::error::ViewerError;
use crate::fasta::to_fasta;
use crate::selection_handler::{KeyAction, KeyEvent, PointerEvent, SelectionHandler, selected_text};
use seqview_engine::{
    FeatureSet, LayoutRows, ScanState, SearchPattern, SearchScan, block_count, block_for_index,
    complement, fragment_window, guess_type, ingest, ingest_cut_sites, sanitize_sequence,
};
use seqview_engine::iupac_code::TYPE_SAMPLE_LEN;
use seqview_protocol::{
    Annotation, CentralIndex, CutSite, Direction, Highlight, SearchMatch, Selection, SequenceType,
    Translation, ViewMode,
};
use seqview_render::{
    CircularOptions, CircularScene, ElementRegistry, LinearOptions, LinearScene, MountedElement,
    RenderedView, block_height, render_circular, render_linear,
};
use std::collections::VecDeque;
use std::sync::Arc;

pub const FULL_TRANSLATION_ID: &str = "translation-full";

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    SelectionChanged(Selection),
    ViewModeChanged(ViewMode),
    AnnotationsChanged(Vec<Annotation>),
    SequenceCommitted {
        name: String,
        length: usize,
        seq_type: SequenceType,
    },
    FeatureDegraded {
        feature: DisplayFeature,
        reason: String,
    },
    /// Something the user should be told about, without blocking them.
    Notice(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Idle,
    Running { scanned: usize, total: usize },
    Done { matches: usize, truncated: bool },
    Invalid { reason: String },
}

#[derive(Debug, Clone)]
struct PendingSequence {
    name: String,
    seq: String,
    seq_type: SequenceType,
    due_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingSwitch {
    mode: ViewMode,
    due_ms: u64,
}

#[derive(Debug, Clone)]
struct SearchState {
    term: Option<String>,
    scan: Option<SearchScan>,
    matches: Vec<SearchMatch>,
    status: SearchStatus,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            term: None,
            scan: None,
            matches: vec![],
            status: SearchStatus::Idle,
        }
    }
}

#[derive(Debug)]
pub struct SequenceViewer {
    config: ViewerConfig,
    display: DnaDisplay,
    name: String,
    seq: Arc<str>,
    seq_type: SequenceType,
    complement: String,
    annotations: Vec<Annotation>,
    cut_sites: Vec<CutSite>,
    highlights: Vec<Highlight>,
    translations: Vec<Translation>,
    search: SearchState,
    view_mode: ViewMode,
    central_index: CentralIndex,
    first_block: usize,
    overlay: Option<String>,
    handler: SelectionHandler,
    registry: ElementRegistry,
    mounted: Vec<MountedElement>,
    pending_sequence: Option<PendingSequence>,
    pending_switch: Option<PendingSwitch>,
    clipboard: ClipboardService,
    events: VecDeque<ViewerEvent>,
}

impl Default for SequenceViewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl SequenceViewer {
    pub fn new(config: ViewerConfig) -> Self {
        let config = config.clamped();
        let handler = SelectionHandler::new(config.bases_per_line(), config.click_interval_ms);
        Self {
            display: DnaDisplay::new(&config),
            config,
            name: String::new(),
            seq: Arc::from(""),
            seq_type: SequenceType::Unknown,
            complement: String::new(),
            annotations: vec![],
            cut_sites: vec![],
            highlights: vec![],
            translations: vec![],
            search: SearchState::default(),
            view_mode: ViewMode::default(),
            central_index: CentralIndex::default(),
            first_block: 0,
            overlay: None,
            handler,
            registry: ElementRegistry::new(),
            mounted: vec![],
            pending_sequence: None,
            pending_switch: None,
            clipboard: ClipboardService::default(),
            events: VecDeque::new(),
        }
    }

    pub fn with_clipboard(mut self, clipboard: ClipboardService) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence(&self) -> &str {
        &self.seq
    }

    pub fn seq_type(&self) -> SequenceType {
        self.seq_type
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn cut_sites(&self) -> &[CutSite] {
        &self.cut_sites
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn size_class(&self) -> SizeClass {
        SizeClass::of(self.layout_len(), &self.config.thresholds)
    }

    /// True while a new sequence waits for its settle delay.
    pub fn is_loading(&self) -> bool {
        self.pending_sequence.is_some()
    }

    /// Length feature coordinates are checked against: the incoming sequence
    /// while one is pending, the committed one otherwise.
    fn layout_len(&self) -> usize {
        self.pending_sequence
            .as_ref()
            .map_or(self.seq.len(), |pending| pending.seq.len())
    }

    fn emit(&mut self, event: ViewerEvent) {
        self.events.push_back(event);
    }

    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        self.events.drain(..).collect()
    }

    /// Replaces the sequence. Features of the old sequence are dropped right
    /// away; features set afterwards belong to the new one. Large sequences
    /// are committed by a later [`poll`](Self::poll); a newer call replaces
    /// one still waiting. Returns whether the sequence was committed at once.
    pub fn set_sequence(
        &mut self,
        name: &str,
        seq: &str,
        seq_type: Option<SequenceType>,
        now_ms: u64,
    ) -> bool {
        let seq_type = seq_type.unwrap_or_else(|| {
            let sample: String = seq
                .chars()
                .filter(|c| !c.is_whitespace())
                .take(TYPE_SAMPLE_LEN)
                .collect();
            guess_type(&sample)
        });
        let seq = sanitize_sequence(seq, seq_type);

        self.annotations.clear();
        self.cut_sites.clear();
        self.highlights.clear();
        self.translations.clear();
        self.search = SearchState::default();
        self.overlay = None;

        if let Some(previous) = self.pending_sequence.take() {
            log::debug!(
                "sequence '{}' superseded before it was committed",
                previous.name
            );
        }
        let delay = SizeClass::of(seq.len(), &self.config.thresholds).settle_delay_ms();
        let pending = PendingSequence {
            name: name.to_string(),
            seq,
            seq_type,
            due_ms: now_ms.saturating_add(delay),
        };
        if delay == 0 {
            self.commit_sequence(pending);
            true
        } else {
            self.pending_sequence = Some(pending);
            false
        }
    }

    fn commit_sequence(&mut self, pending: PendingSequence) {
        let PendingSequence {
            name,
            seq,
            seq_type,
            ..
        } = pending;
        self.display.set_seq_len(seq.len());
        let complement_shown = self
            .display
            .unavailable_reason(DisplayFeature::Complement)
            .is_none();
        self.complement = if seq_type.is_nucleotide() && complement_shown {
            complement(&seq, seq_type)
        } else {
            String::new()
        };
        self.seq = Arc::from(seq);
        self.seq_type = seq_type;
        self.name = name;
        self.handler.reset(self.seq.len());
        self.central_index = CentralIndex::default();
        self.first_block = 0;
        log::info!(
            "committed sequence '{}': {} bases, {}",
            self.name,
            self.seq.len(),
            self.seq_type
        );
        self.emit(ViewerEvent::SequenceCommitted {
            name: self.name.clone(),
            length: self.seq.len(),
            seq_type: self.seq_type,
        });
        for feature in [
            DisplayFeature::Translation,
            DisplayFeature::Complement,
            DisplayFeature::Index,
        ] {
            if let Some(reason) = self.display.unavailable_reason(feature) {
                log::info!("{reason}");
                self.emit(ViewerEvent::FeatureDegraded { feature, reason });
            }
        }
        if let Some(term) = self.search.term.take() {
            self.set_search(&term);
        }
    }

    /// Runs delayed work that is due: sequence commits, view switches and a
    /// chunk of any running search. Returns whether a repaint is needed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let mut changed = false;
        if self
            .pending_sequence
            .as_ref()
            .is_some_and(|pending| pending.due_ms <= now_ms)
        {
            if let Some(pending) = self.pending_sequence.take() {
                self.commit_sequence(pending);
                changed = true;
            }
        }
        if let Some(switch) = self.pending_switch.filter(|switch| switch.due_ms <= now_ms) {
            self.pending_switch = None;
            self.view_mode = switch.mode;
            log::debug!("switched to the {} view", switch.mode);
            self.emit(ViewerEvent::ViewModeChanged(switch.mode));
            // Matches through the origin only exist on the circular map.
            if let Some(term) = self.search.term.clone() {
                self.set_search(&term);
            }
            changed = true;
        }
        if self.search.scan.is_some() {
            changed |= self.step_search();
        }
        changed
    }

    /// Schedules a switch to `mode` after a size-dependent delay. Asking again
    /// for the mode already scheduled does nothing; asking for the current
    /// mode cancels the scheduled switch.
    pub fn set_view_mode(&mut self, mode: ViewMode, now_ms: u64) -> bool {
        if let Some(pending) = self.pending_switch {
            if pending.mode == mode {
                return false;
            }
            log::debug!("switch to the {} view cancelled", pending.mode);
            self.pending_switch = None;
        }
        if mode == self.view_mode {
            return false;
        }
        let delay = self.size_class().switch_delay_ms();
        self.pending_switch = Some(PendingSwitch {
            mode,
            due_ms: now_ms.saturating_add(delay),
        });
        true
    }

    pub fn toggle_view_mode(&mut self, now_ms: u64) -> bool {
        let target = self
            .pending_switch
            .map_or(self.view_mode, |pending| pending.mode)
            .toggled();
        self.set_view_mode(target, now_ms)
    }

    /// Milliseconds until the scheduled view switch, if one is scheduled.
    pub fn pending_switch_delay(&self, now_ms: u64) -> Option<u64> {
        self.pending_switch
            .map(|pending| pending.due_ms.saturating_sub(now_ms))
    }

    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations = ingest(annotations, self.layout_len());
    }

    pub fn set_cut_sites(&mut self, cut_sites: Vec<CutSite>) {
        self.cut_sites = ingest_cut_sites(cut_sites, self.layout_len());
    }

    pub fn set_highlights(&mut self, highlights: Vec<Highlight>) {
        self.highlights = ingest(highlights, self.layout_len());
    }

    pub fn set_translations(&mut self, translations: Vec<Translation>) {
        self.translations = ingest(translations, self.layout_len());
    }

    pub fn set_overlay(&mut self, overlay: Option<String>) {
        self.overlay = overlay;
    }

    fn annotations_changed(&mut self) {
        self.emit(ViewerEvent::AnnotationsChanged(self.annotations.clone()));
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        let mut ingested = ingest(vec![annotation], self.layout_len());
        self.annotations.append(&mut ingested);
        self.annotations_changed();
    }

    pub fn update_annotation(&mut self, annotation: Annotation) -> Result<(), ViewerError> {
        let seq_len = self.layout_len();
        let slot = self
            .annotations
            .iter_mut()
            .find(|existing| existing.id == annotation.id)
            .ok_or_else(|| ViewerError::UnknownElement(annotation.id.clone()))?;
        *slot = ingest(vec![annotation], seq_len)
            .pop()
            .ok_or_else(|| ViewerError::Config("annotation lost during ingestion".to_string()))?;
        self.annotations_changed();
        Ok(())
    }

    pub fn remove_annotation(&mut self, id: &str) -> Result<Annotation, ViewerError> {
        let position = self
            .annotations
            .iter()
            .position(|annotation| annotation.id == id)
            .ok_or_else(|| ViewerError::UnknownElement(id.to_string()))?;
        let removed = self.annotations.remove(position);
        self.annotations_changed();
        Ok(removed)
    }

    /// Starts a search for `term`. Short sequences are scanned right away;
    /// longer ones continue in [`poll`](Self::poll).
    pub fn set_search(&mut self, term: &str) -> &SearchStatus {
        self.search = SearchState::default();
        let term = term.trim();
        if term.is_empty() {
            return &self.search.status;
        }
        self.search.term = Some(term.to_string());
        if self.is_loading() {
            return &self.search.status;
        }
        match SearchPattern::new(term, self.seq_type) {
            Ok(pattern) => {
                let circular = self.view_mode == ViewMode::Circular;
                let max = self.display.max_search_matches();
                self.search.scan = Some(SearchScan::new(pattern, self.seq.clone(), circular, max));
                self.step_search();
            }
            Err(error) => {
                self.search.status = SearchStatus::Invalid {
                    reason: error.to_string(),
                };
            }
        }
        &self.search.status
    }

    fn step_search(&mut self) -> bool {
        let chunk = self.config.thresholds.search_chunk;
        let Some(scan) = self.search.scan.as_mut() else {
            return false;
        };
        match scan.step(chunk) {
            ScanState::Running { scanned, total } => {
                self.search.status = SearchStatus::Running { scanned, total };
                false
            }
            ScanState::Done => {
                let truncated = scan.is_truncated();
                let matches = self
                    .search
                    .scan
                    .take()
                    .map(SearchScan::into_matches)
                    .unwrap_or_default();
                if truncated {
                    self.emit(ViewerEvent::Notice(format!(
                        "Showing the first {} matches only",
                        matches.len()
                    )));
                }
                self.search.status = SearchStatus::Done {
                    matches: matches.len(),
                    truncated,
                };
                self.search.matches = matches;
                true
            }
        }
    }

    pub fn search_status(&self) -> &SearchStatus {
        &self.search.status
    }

    pub fn search_matches(&self) -> &[SearchMatch] {
        &self.search.matches
    }

    /// Turns a display track on or off. The returned status says whether it
    /// will actually be drawn, and why not when it is forced off.
    pub fn set_feature(&mut self, feature: DisplayFeature, show: bool) -> FeatureStatus {
        self.display.set(feature, show);
        let status = self.display.status(feature);
        if let (true, Some(reason)) = (show, status.reason()) {
            log::info!("{reason}");
            self.emit(ViewerEvent::FeatureDegraded {
                feature,
                reason: reason.to_string(),
            });
        }
        status
    }

    pub fn feature_status(&self, feature: DisplayFeature) -> FeatureStatus {
        self.display.status(feature)
    }

    pub fn set_zoom(&mut self, mode: ViewMode, level: u8) {
        match mode {
            ViewMode::Linear => self.config.zoom.linear = level.min(crate::config::MAX_ZOOM),
            ViewMode::Circular => self.config.zoom.circular = level.min(crate::config::MAX_ZOOM),
        }
        self.handler.set_bases_per_line(self.config.bases_per_line());
    }

    pub fn central_index(&self) -> usize {
        self.central_index.get()
    }

    pub fn set_central_index(&mut self, index: usize) {
        self.central_index = CentralIndex::new(index, self.seq.len());
    }

    /// Rotates the circular map, as a scroll does. The selection is untouched.
    pub fn rotate_by(&mut self, delta: i64) {
        self.central_index = self.central_index.rotated(delta, self.seq.len());
    }

    pub fn selection(&self) -> Selection {
        self.handler.selection()
    }

    pub fn set_selection(&mut self, selection: Selection) {
        let selection = self.handler.set_selection(selection);
        self.emit(ViewerEvent::SelectionChanged(selection));
    }

    pub fn selected_text(&self) -> String {
        selected_text(&self.seq, &self.handler.selection())
    }

    fn selection_result(&mut self, selection: Option<Selection>) -> Option<Selection> {
        if let Some(selection) = selection {
            self.emit(ViewerEvent::SelectionChanged(selection));
        }
        selection
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) -> Option<Selection> {
        let selection = self.handler.mouse_down(&self.registry, event);
        self.selection_result(selection)
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) -> Option<Selection> {
        let selection = self.handler.mouse_move(&self.registry, event);
        self.selection_result(selection)
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) -> Option<Selection> {
        let selection = self.handler.mouse_up(&self.registry, event);
        self.selection_result(selection)
    }

    /// Handles a key press. Returns the copy result for copy shortcuts.
    pub fn key_down(&mut self, event: &KeyEvent) -> Option<CopyOutcome> {
        match self.handler.key_down(event) {
            KeyAction::Ignored => None,
            KeyAction::Selected(selection) => {
                self.emit(ViewerEvent::SelectionChanged(selection));
                None
            }
            KeyAction::Copy(_) => Some(self.copy_selection()),
        }
    }

    pub fn copy_selection(&mut self) -> CopyOutcome {
        let text = self.selected_text();
        let outcome = self.clipboard.copy(&text);
        if let CopyOutcome::Failed { notice } = &outcome {
            self.emit(ViewerEvent::Notice(notice.clone()));
        }
        outcome
    }

    pub fn fasta(&self) -> Result<String, ViewerError> {
        to_fasta(&self.name, &self.seq)
    }

    pub fn bases_per_line(&self) -> usize {
        self.config.bases_per_line()
    }

    pub fn first_block(&self) -> usize {
        self.first_block
    }

    pub fn scroll_to_block(&mut self, block: usize) {
        let last = block_count(self.seq.len(), self.bases_per_line()).saturating_sub(1);
        self.first_block = block.min(last);
    }

    /// Scrolls the linear view so the selection start is on the first line.
    pub fn scroll_to_selection(&mut self) {
        let block = block_for_index(
            self.handler.selection().start,
            self.seq.len(),
            self.bases_per_line(),
        );
        self.scroll_to_block(block);
    }

    fn feature_set(&self) -> FeatureSet {
        let mut translations: Vec<Arc<Translation>> = vec![];
        if self.seq_type.is_nucleotide() {
            translations.extend(self.translations.iter().cloned().map(Arc::new));
            if self.display.shows(DisplayFeature::Translation) && !self.seq.is_empty() {
                translations.push(Arc::new(Translation {
                    id: FULL_TRANSLATION_ID.to_string(),
                    start: 0,
                    end: self.seq.len(),
                    direction: Direction::Forward,
                }));
            }
        }
        FeatureSet {
            annotations: self.annotations.iter().cloned().map(Arc::new).collect(),
            cut_sites: self.cut_sites.iter().cloned().map(Arc::new).collect(),
            search_matches: self.search.matches.iter().cloned().map(Arc::new).collect(),
            highlights: self.highlights.iter().cloned().map(Arc::new).collect(),
            translations,
        }
    }

    pub fn layout_rows(&self) -> LayoutRows {
        LayoutRows::pack(&self.feature_set(), self.seq.len())
    }

    fn linear_options(&self) -> LinearOptions {
        let nucleotide = self.seq_type.is_nucleotide();
        LinearOptions {
            width: self.config.width,
            char_width: self.config.effective_char_width(),
            line_height: self.config.line_height,
            bases_per_line: self.bases_per_line(),
            show_index: self.display.shows(DisplayFeature::Index),
            show_complement: nucleotide && self.display.shows(DisplayFeature::Complement),
            show_annotations: self.display.shows(DisplayFeature::Annotations),
            show_cut_sites: self.display.shows(DisplayFeature::CutSites),
            show_translation: nucleotide && self.display.shows(DisplayFeature::Translation),
        }
    }

    fn circular_options(&self) -> CircularOptions {
        CircularOptions {
            width: self.config.width,
            height: self.config.height,
            zoom: self.config.zoom.circular,
            show_index: self.display.shows(DisplayFeature::Index),
            show_annotations: self.display.shows(DisplayFeature::Annotations),
            show_cut_sites: self.display.shows(DisplayFeature::CutSites),
        }
    }

    fn render_linear_window(&self, rows: &LayoutRows) -> RenderedView {
        let options = self.linear_options();
        let seq_len = self.seq.len();
        let complement = if options.show_complement {
            self.complement.as_str()
        } else {
            ""
        };
        let total = block_count(seq_len, options.bases_per_line);
        let mut blocks = vec![];
        let mut height = 0.0;
        let mut next = self.first_block;
        while next < total && height < self.config.height {
            let mut chunk = fragment_window(rows, seq_len, options.bases_per_line, next..next + 1);
            for block in &chunk {
                height += block_height(block, &options, !complement.is_empty());
            }
            blocks.append(&mut chunk);
            next += 1;
        }
        let scene = LinearScene {
            seq: &self.seq,
            complement,
            seq_type: self.seq_type,
            blocks: &blocks,
            selection: Some(self.handler.selection()),
        };
        render_linear(&scene, &options)
    }

    /// Lays out and draws the current view, replacing the registered
    /// elements of the previous render with the new ones.
    pub fn render(&mut self) -> RenderedView {
        let rows = self.layout_rows();
        let view = match self.view_mode {
            ViewMode::Linear => self.render_linear_window(&rows),
            ViewMode::Circular => {
                let scene = CircularScene {
                    name: &self.name,
                    seq: &self.seq,
                    seq_type: self.seq_type,
                    rows: &rows,
                    central_index: self.central_index.get(),
                    selection: Some(self.handler.selection()),
                    overlay: self.overlay.as_deref(),
                };
                render_circular(&scene, &self.circular_options())
            }
        };
        self.registry.unmount(&self.mounted);
        self.registry.mount(&view.elements);
        self.mounted = view.elements.clone();
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{CopyPath, MemoryClipboard};
    use crate::selection_handler::{Key, Modifiers};

    fn viewer_with(seq: &str) -> SequenceViewer {
        let mut viewer = SequenceViewer::new(ViewerConfig {
            bases_per_line: Some(20),
            ..Default::default()
        });
        assert!(viewer.set_sequence("test", seq, None, 0));
        viewer
    }

    #[test]
    fn small_sequences_commit_immediately() {
        let mut viewer = viewer_with("atgc atgc");
        assert_eq!(viewer.sequence(), "ATGCATGC");
        assert_eq!(viewer.seq_type(), SequenceType::Dna);
        assert!(matches!(
            viewer.drain_events().as_slice(),
            [ViewerEvent::SequenceCommitted { length: 8, .. }]
        ));
    }

    #[test]
    fn large_sequences_settle_and_can_be_superseded() {
        let mut viewer = SequenceViewer::default();
        let first = "A".repeat(60_000);
        let second = "C".repeat(70_000);
        assert!(!viewer.set_sequence("first", &first, None, 0));
        assert!(viewer.is_loading());
        viewer.set_annotations(vec![Annotation::new("a", "a", 65_000, 69_000, Direction::Forward)]);
        assert!(!viewer.set_sequence("second", &second, None, 50));
        assert!(viewer.annotations().is_empty());
        assert!(!viewer.poll(100));
        assert!(viewer.poll(150));
        assert_eq!(viewer.name(), "second");
        assert_eq!(viewer.sequence().len(), 70_000);
        let committed: Vec<_> = viewer
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, ViewerEvent::SequenceCommitted { .. }))
            .collect();
        assert_eq!(committed.len(), 1);
    }

    #[test]
    fn view_switch_is_debounced() {
        let mut viewer = viewer_with("ATGCATGCAT");
        assert!(viewer.set_view_mode(ViewMode::Circular, 0));
        assert!(!viewer.set_view_mode(ViewMode::Circular, 10));
        assert_eq!(viewer.pending_switch_delay(10), Some(90));
        assert!(!viewer.poll(50));
        assert!(viewer.poll(100));
        assert_eq!(viewer.view_mode(), ViewMode::Circular);
        assert!(!viewer.set_view_mode(ViewMode::Circular, 200));

        assert!(viewer.toggle_view_mode(300));
        assert!(!viewer.toggle_view_mode(310));
        assert_eq!(viewer.pending_switch_delay(310), None);
        viewer.poll(1000);
        assert_eq!(viewer.view_mode(), ViewMode::Circular);
    }

    #[test]
    fn out_of_range_annotations_are_clamped() {
        let mut viewer = viewer_with(&"ATGC".repeat(25));
        viewer.set_annotations(vec![Annotation::new("late", "late", 150, 180, Direction::Forward)]);
        let annotation = &viewer.annotations()[0];
        assert_eq!((annotation.start, annotation.end), (99, 100));
    }

    #[test]
    fn annotation_editing_emits_changes() {
        let mut viewer = viewer_with(&"ATGC".repeat(25));
        viewer.drain_events();
        viewer.add_annotation(Annotation::new("p", "promoter", 5, 20, Direction::Forward));
        viewer
            .update_annotation(Annotation::new("p", "promoter", 6, 21, Direction::Forward))
            .unwrap();
        assert!(matches!(
            viewer.update_annotation(Annotation::new("q", "q", 1, 2, Direction::None)),
            Err(ViewerError::UnknownElement(id)) if id == "q"
        ));
        let removed = viewer.remove_annotation("p").unwrap();
        assert_eq!(removed.start, 6);
        let changes = viewer
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, ViewerEvent::AnnotationsChanged(_)))
            .count();
        assert_eq!(changes, 3);
    }

    #[test]
    fn search_finds_both_strands() {
        let mut viewer = viewer_with("AGGACCTCC");
        assert_eq!(
            viewer.set_search("gga"),
            &SearchStatus::Done {
                matches: 2,
                truncated: false
            }
        );
        assert!(viewer.search_matches()[1].direction.is_reverse());
        assert!(matches!(viewer.set_search("GGJ"), SearchStatus::Invalid { .. }));
        assert_eq!(viewer.set_search("  "), &SearchStatus::Idle);
    }

    #[test]
    fn long_searches_run_in_chunks() {
        let mut viewer = SequenceViewer::new(ViewerConfig {
            thresholds: crate::config::Thresholds {
                search_chunk: 10,
                ..Default::default()
            },
            ..Default::default()
        });
        viewer.set_sequence("chunks", &"ATGCA".repeat(10), None, 0);
        assert!(matches!(viewer.set_search("GCA"), SearchStatus::Running { .. }));
        let mut polls = 0;
        while !viewer.poll(0) {
            polls += 1;
        }
        assert!(polls >= 2);
        assert_eq!(viewer.search_matches().len(), 20);
    }

    #[test]
    fn view_switch_reruns_the_search() {
        let mut viewer = viewer_with("GCTTTTTAT");
        assert_eq!(
            viewer.set_search("ATGC"),
            &SearchStatus::Done {
                matches: 0,
                truncated: false
            }
        );

        viewer.set_view_mode(ViewMode::Circular, 0);
        viewer.poll(1_000);
        let wrapping: Vec<_> = viewer
            .search_matches()
            .iter()
            .map(|m| (m.start, m.end))
            .collect();
        assert_eq!(wrapping, vec![(7, 2)]);

        viewer.set_view_mode(ViewMode::Linear, 2_000);
        viewer.poll(3_000);
        assert!(viewer.search_matches().is_empty());
        assert_eq!(viewer.search_status(), &SearchStatus::Done { matches: 0, truncated: false });
    }

    #[test]
    fn rotation_leaves_selection_alone() {
        let mut viewer = viewer_with(&"ATGC".repeat(25));
        viewer.set_selection(Selection::new(10, 20, true));
        viewer.rotate_by(-5);
        assert_eq!(viewer.central_index(), 95);
        viewer.rotate_by(10);
        assert_eq!(viewer.central_index(), 5);
        viewer.set_central_index(250);
        assert_eq!(viewer.central_index(), 50);
        assert_eq!(viewer.selection(), Selection::new(10, 20, true));
    }

    #[test]
    fn render_replaces_registered_elements() {
        let mut viewer = viewer_with(&"ATGC".repeat(25));
        viewer.set_annotations(vec![Annotation::new("gene", "gene", 10, 50, Direction::Forward)]);
        let linear = viewer.render();
        assert!(linear.elements.iter().any(|e| e.id == "block-0"));
        assert!(viewer.registry().contains("gene@block-1"));

        viewer.set_view_mode(ViewMode::Circular, 0);
        viewer.poll(1_000);
        viewer.render();
        assert!(!viewer.registry().contains("block-0"));
        assert!(viewer.registry().contains("gene"));
        assert!(viewer.registry().contains("circular-seq"));
    }

    #[test]
    fn clicking_a_rendered_annotation_selects_it() {
        let mut viewer = viewer_with(&"ATGC".repeat(25));
        viewer.set_annotations(vec![Annotation::new("rev", "rev", 30, 45, Direction::Reverse)]);
        viewer.render();
        viewer.drain_events();
        let selected = viewer.pointer_down(&PointerEvent::new("rev@block-1", 0.0, 0.0, 0));
        assert_eq!(selected, Some(Selection::new(45, 30, false)));
        assert_eq!(
            viewer.drain_events(),
            vec![ViewerEvent::SelectionChanged(Selection::new(45, 30, false))]
        );
    }

    #[test]
    fn copy_falls_back_and_reports_failures() {
        let clipboard = ClipboardService::new(Box::new(MemoryClipboard::unavailable("native")))
            .with_fallback(Box::new(MemoryClipboard::new("textarea")));
        let mut viewer = SequenceViewer::default().with_clipboard(clipboard);
        viewer.set_sequence("copy", "AACCGGTT", None, 0);
        viewer.set_selection(Selection::new(2, 6, true));
        let outcome = viewer.key_down(&KeyEvent::new(Key::Char('c'), Modifiers::command()));
        assert_eq!(
            outcome,
            Some(CopyOutcome::Copied {
                via: CopyPath::Fallback,
                bases: 4
            })
        );
        assert_eq!(viewer.selected_text(), "CCGG");

        let clipboard = ClipboardService::new(Box::new(MemoryClipboard::unavailable("native")));
        let mut viewer = SequenceViewer::default().with_clipboard(clipboard);
        viewer.set_sequence("copy", "AACCGGTT", None, 0);
        viewer.set_selection(Selection::new(2, 6, true));
        viewer.drain_events();
        assert!(matches!(viewer.copy_selection(), CopyOutcome::Failed { .. }));
        assert!(matches!(viewer.drain_events().as_slice(), [ViewerEvent::Notice(_)]));
    }

    #[test]
    fn linear_view_is_windowed() {
        let mut viewer = SequenceViewer::new(ViewerConfig {
            bases_per_line: Some(50),
            height: 200.0,
            ..Default::default()
        });
        viewer.set_sequence("long", &"ATGC".repeat(5_000), None, 0);
        let view = viewer.render();
        let blocks = view.elements.iter().filter(|e| e.id.starts_with("block-")).count();
        assert!(blocks > 0 && blocks < 10);

        viewer.set_selection(Selection::cursor(10_020));
        viewer.scroll_to_selection();
        assert_eq!(viewer.first_block(), 200);
        viewer.render();
        assert!(viewer.registry().contains("block-200"));
        assert!(!viewer.registry().contains("block-0"));
    }

    #[test]
    fn non_ascii_residues_take_one_cell() {
        let mut viewer = SequenceViewer::default();
        viewer.set_sequence("odd", "MVKé€LS", Some(SequenceType::Aa), 0);
        assert_eq!(viewer.sequence(), "MVKXXLS");
        viewer.set_selection(Selection::new(2, 6, true));
        assert_eq!(viewer.selected_text(), "KXXL");
    }

    #[test]
    fn protein_sequences_have_no_complement_or_translation() {
        let mut viewer = SequenceViewer::default();
        viewer.set_sequence("globin", "MVLSPADKTNVKAAWGKVGAHAGEYGAEALERMFLSFPTTKTYFPHF", None, 0);
        assert_eq!(viewer.seq_type(), SequenceType::Aa);
        viewer.set_feature(DisplayFeature::Translation, true);
        let view = viewer.render();
        assert!(!view.elements.iter().any(|e| e.id.starts_with(FULL_TRANSLATION_ID)));
        assert_eq!(viewer.fasta().unwrap().lines().next(), Some(">globin"));
    }
}
