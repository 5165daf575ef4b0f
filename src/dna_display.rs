use crate::config::{Thresholds, ViewerConfig};
use std::fmt;

/// How a sequence compares to the size thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SizeClass {
    Small,
    Large,
    Huge,
    VeryLarge,
}

impl SizeClass {
    pub fn of(seq_len: usize, thresholds: &Thresholds) -> Self {
        if seq_len > thresholds.very_large_sequence {
            SizeClass::VeryLarge
        } else if seq_len > thresholds.huge_sequence {
            SizeClass::Huge
        } else if seq_len > thresholds.large_sequence {
            SizeClass::Large
        } else {
            SizeClass::Small
        }
    }

    /// Milliseconds a new sequence waits before it is committed, so a loading
    /// state can be shown before the layout pass.
    pub fn settle_delay_ms(self) -> u64 {
        match self {
            SizeClass::Small => 0,
            SizeClass::Large => 100,
            SizeClass::Huge => 300,
            SizeClass::VeryLarge => 500,
        }
    }

    /// Debounce before a linear/circular switch takes effect.
    pub fn switch_delay_ms(self) -> u64 {
        match self {
            SizeClass::Small => 100,
            SizeClass::Large => 250,
            SizeClass::Huge => 500,
            SizeClass::VeryLarge => 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayFeature {
    Translation,
    Complement,
    Index,
    Annotations,
    CutSites,
}

impl fmt::Display for DisplayFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayFeature::Translation => "translation",
            DisplayFeature::Complement => "complement strand",
            DisplayFeature::Index => "index",
            DisplayFeature::Annotations => "annotations",
            DisplayFeature::CutSites => "cut sites",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureStatus {
    On,
    Off,
    /// Forced off regardless of the toggle.
    Disabled { reason: String },
}

impl FeatureStatus {
    pub fn is_shown(&self) -> bool {
        matches!(self, FeatureStatus::On)
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, FeatureStatus::Disabled { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            FeatureStatus::Disabled { reason } => Some(reason),
            _ => None,
        }
    }
}

/// What the user asked to see, and what the current sequence allows.
#[derive(Debug, Clone, PartialEq)]
pub struct DnaDisplay {
    show_complement: bool,
    show_index: bool,
    show_translation: bool,
    show_annotations: bool,
    show_cut_sites: bool,
    seq_len: usize,
    thresholds: Thresholds,
}

impl DnaDisplay {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            show_complement: config.show_complement,
            show_index: config.show_index,
            show_translation: config.show_translation,
            show_annotations: config.show_annotations,
            show_cut_sites: config.show_cut_sites,
            seq_len: 0,
            thresholds: config.thresholds,
        }
    }

    pub fn set_seq_len(&mut self, seq_len: usize) {
        self.seq_len = seq_len;
    }

    pub fn size_class(&self) -> SizeClass {
        SizeClass::of(self.seq_len, &self.thresholds)
    }

    fn wanted(&self, feature: DisplayFeature) -> bool {
        match feature {
            DisplayFeature::Translation => self.show_translation,
            DisplayFeature::Complement => self.show_complement,
            DisplayFeature::Index => self.show_index,
            DisplayFeature::Annotations => self.show_annotations,
            DisplayFeature::CutSites => self.show_cut_sites,
        }
    }

    pub fn set(&mut self, feature: DisplayFeature, show: bool) {
        let toggle = match feature {
            DisplayFeature::Translation => &mut self.show_translation,
            DisplayFeature::Complement => &mut self.show_complement,
            DisplayFeature::Index => &mut self.show_index,
            DisplayFeature::Annotations => &mut self.show_annotations,
            DisplayFeature::CutSites => &mut self.show_cut_sites,
        };
        *toggle = show;
    }

    pub fn toggle(&mut self, feature: DisplayFeature) {
        let show = !self.wanted(feature);
        self.set(feature, show);
    }

    /// Why `feature` cannot be shown at the current size, if it cannot.
    pub fn unavailable_reason(&self, feature: DisplayFeature) -> Option<String> {
        let gated = matches!(
            feature,
            DisplayFeature::Translation | DisplayFeature::Complement | DisplayFeature::Index
        );
        (gated && self.size_class() == SizeClass::VeryLarge).then(|| {
            format!(
                "The {feature} is not available for sequences over {} bases (this one has {})",
                self.thresholds.very_large_sequence, self.seq_len
            )
        })
    }

    pub fn status(&self, feature: DisplayFeature) -> FeatureStatus {
        if let Some(reason) = self.unavailable_reason(feature) {
            return FeatureStatus::Disabled { reason };
        }
        if self.wanted(feature) {
            FeatureStatus::On
        } else {
            FeatureStatus::Off
        }
    }

    pub fn shows(&self, feature: DisplayFeature) -> bool {
        self.status(feature).is_shown()
    }

    pub fn max_search_matches(&self) -> usize {
        if self.size_class() >= SizeClass::Large {
            self.thresholds.max_search_matches_large
        } else {
            self.thresholds.max_search_matches
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_classes() {
        let t = Thresholds::default();
        assert_eq!(SizeClass::of(2686, &t), SizeClass::Small);
        assert_eq!(SizeClass::of(50_001, &t), SizeClass::Large);
        assert_eq!(SizeClass::of(1_500_000, &t), SizeClass::Huge);
        assert_eq!(SizeClass::of(6_000_000, &t), SizeClass::VeryLarge);
        assert_eq!(SizeClass::VeryLarge.switch_delay_ms(), 1000);
        assert_eq!(SizeClass::Small.switch_delay_ms(), 100);
    }

    #[test]
    fn very_large_sequences_disable_expensive_tracks() {
        let mut display = DnaDisplay::new(&ViewerConfig::default());
        display.set(DisplayFeature::Translation, true);
        assert_eq!(display.status(DisplayFeature::Translation), FeatureStatus::On);

        display.set_seq_len(6_000_000);
        let status = display.status(DisplayFeature::Translation);
        assert!(status.is_disabled());
        assert!(status.reason().unwrap().contains("6000000"));
        assert!(display.status(DisplayFeature::Complement).is_disabled());
        assert!(display.status(DisplayFeature::Index).is_disabled());
        assert_eq!(display.status(DisplayFeature::Annotations), FeatureStatus::On);
        assert_eq!(display.max_search_matches(), 500);
    }

    #[test]
    fn toggles_flip() {
        let mut display = DnaDisplay::new(&ViewerConfig::default());
        assert!(display.shows(DisplayFeature::Complement));
        display.toggle(DisplayFeature::Complement);
        assert_eq!(display.status(DisplayFeature::Complement), FeatureStatus::Off);
    }
}
