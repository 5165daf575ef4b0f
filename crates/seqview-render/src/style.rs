use seqview_engine::AminoAcidClass;

pub const FONT_FAMILY: &str = "monospace";
pub const TEXT_COLOR: &str = "#111111";
pub const MUTED_TEXT_COLOR: &str = "#444444";
pub const INDEX_COLOR: &str = "#808080";
pub const CUT_SITE_COLOR: &str = "#8b0000";
pub const SELECTION_COLOR: &str = "#DEF6FF";
pub const SELECTION_EDGE_COLOR: &str = "#1F78B4";

/// Labels longer than this are cut and end in an ellipsis.
pub const MAX_LABEL_CHARS: usize = 12;

pub fn base_color(base: u8) -> &'static str {
    match base.to_ascii_uppercase() {
        b'A' => "#2B8A3E",
        b'T' | b'U' => "#C92A2A",
        b'G' => "#343A40",
        b'C' => "#1C7ED6",
        _ => "#868E96",
    }
}

pub fn amino_acid_color(class: AminoAcidClass) -> &'static str {
    match class {
        AminoAcidClass::Nonpolar => "#FFE8A3",
        AminoAcidClass::Polar => "#B8E6C1",
        AminoAcidClass::Acidic => "#F7B7B7",
        AminoAcidClass::Basic => "#B7CFF7",
        AminoAcidClass::Stop => "#D0D0D0",
        AminoAcidClass::Other => "#EEEEEE",
    }
}

/// Rough rendered width of a monospace label.
pub fn estimate_text_width(label: &str, font_size: f64) -> f64 {
    (label.chars().count().max(1) as f64) * font_size * 0.65
}

pub fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        return label.to_string();
    }
    let mut short: String = label.chars().take(MAX_LABEL_CHARS).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_truncated_after_twelve_chars() {
        assert_eq!(truncate_label("lac promoter"), "lac promoter");
        assert_eq!(truncate_label("beta-lactamase gene"), "beta-lactama…");
    }

    #[test]
    fn text_width_grows_with_length() {
        assert!(estimate_text_width("ampR", 10.0) < estimate_text_width("ampR ampR", 10.0));
        assert_eq!(estimate_text_width("", 10.0), 6.5);
    }
}
