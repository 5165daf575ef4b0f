use seqview::protocol::{Annotation, Direction, Selection, ViewMode};
use seqview::render::ElementKind;
use seqview::{Key, KeyEvent, Modifiers, SequenceViewer, ViewerConfig};

const PUC19_LEN: usize = 2686;

/// A 2686 bp stand-in for the pUC19 backbone. Only its length matters to
/// the layout.
fn puc19_sequence() -> String {
    "GATCCTCTAGAGTCGACCTGCAGGCATGCAAGCTTGGCACTGGCCGTCGTTTTAC"
        .chars()
        .cycle()
        .take(PUC19_LEN)
        .collect()
}

fn puc19_annotations() -> Vec<Annotation> {
    vec![
        Annotation::new("ori", "ori", 1760, 2348, Direction::Forward),
        Annotation::new("ampR", "ampR", 610, 1470, Direction::Reverse),
        Annotation::new("lacZa", "lacZα", 30, 395, Direction::Forward),
        Annotation::new("lac-promoter", "lac promoter", 395, 425, Direction::Forward),
    ]
}

fn puc19_viewer() -> SequenceViewer {
    let mut viewer = SequenceViewer::new(ViewerConfig {
        bases_per_line: Some(100),
        height: 10_000.0,
        ..Default::default()
    });
    assert!(viewer.set_sequence("pUC19", &puc19_sequence(), None, 0));
    viewer.set_annotations(puc19_annotations());
    viewer
}

#[test]
fn canonical_annotations_share_one_row() {
    let viewer = puc19_viewer();
    let rows = viewer.layout_rows();
    assert_eq!(rows.annotations.len(), 1);
    let ids: Vec<&str> = rows.annotations[0].iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["lacZa", "lac-promoter", "ampR", "ori"]);
}

#[test]
fn overlapping_feature_opens_a_second_row() {
    let mut viewer = puc19_viewer();
    let mut annotations = puc19_annotations();
    annotations.push(Annotation::new("bla-promoter", "bla promoter", 1400, 1500, Direction::Reverse));
    annotations.push(Annotation::new("wrap", "wrap", 2600, 20, Direction::Forward));
    viewer.set_annotations(annotations);
    let rows = viewer.layout_rows();
    assert_eq!(rows.annotations.len(), 2);
    let second: Vec<&str> = rows.annotations[1].iter().map(|a| a.id.as_str()).collect();
    assert_eq!(second, vec!["bla-promoter"]);
    let first: Vec<&str> = rows.annotations[0].iter().map(|a| a.id.as_str()).collect();
    assert_eq!(first.last(), Some(&"wrap"));
}

#[test]
fn linear_view_splits_annotations_over_lines() {
    let mut viewer = puc19_viewer();
    let view = viewer.render();
    let blocks = view
        .elements
        .iter()
        .filter(|e| e.meta.kind == ElementKind::Seq)
        .count();
    assert_eq!(blocks, 27);
    for id in ["lacZa@block-0", "lacZa@block-1", "lacZa@block-2", "lacZa@block-3"] {
        let meta = viewer.registry().get(id).unwrap();
        assert_eq!((meta.range.start, meta.range.end), (30, 395));
    }
    assert!(!viewer.registry().contains("lacZa@block-4"));
    assert!(viewer.registry().contains("ori@block-23"));
}

#[test]
fn circular_view_draws_whole_arcs() {
    let mut viewer = puc19_viewer();
    viewer.set_view_mode(ViewMode::Circular, 0);
    viewer.poll(1_000);
    let view = viewer.render();
    let annotations: Vec<&str> = view
        .elements
        .iter()
        .filter(|e| e.meta.kind == ElementKind::Annotation)
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(annotations.len(), 4);
    assert!(view.svg.contains("2686 bp"));
    assert!(view.svg.contains("pUC19"));
}

#[test]
fn clicking_ampr_selects_it_in_reverse() {
    let mut viewer = puc19_viewer();
    viewer.render();
    let event = seqview::PointerEvent::new("ampR@block-8", 0.0, 0.0, 0);
    assert_eq!(viewer.pointer_down(&event), Some(Selection::new(1470, 610, false)));
    assert_eq!(viewer.selected_text().len(), 860);
    assert_eq!(viewer.selection().length(PUC19_LEN), 860);

    viewer.key_down(&KeyEvent::new(Key::ArrowRight, Modifiers::shift()));
    assert_eq!(viewer.selection(), Selection::new(1470, 611, false));
    assert_eq!(viewer.selection().length(PUC19_LEN), 859);
}

#[test]
fn fasta_export() {
    let viewer = puc19_viewer();
    let fasta = viewer.fasta().unwrap();
    let (header, body) = fasta.split_once('\n').unwrap();
    assert_eq!(header, ">pUC19");
    assert_eq!(body.len(), PUC19_LEN);
}
