use crate::scoring::{LevelBand, RuleEntry, ScoringConfig, ScoringEngine, Segmentation};

pub(super) const SHIFT_NOTE: &str = "Chaperoned exam- rectal/pelvic/breast/genital
Fluorescein stain/Eye irrigation
Procedures (prep/assist) w/ such as joint asp/inj
Diagnostic test, prep for Special Imaging 2 or more (CT, MRI, US, VQ scan) or any one combined with Lab, 
Sexual assault exam
O2 cannula
Procedures (Prep/Assist) for lac repair, I&D, FB Removal, Dental/Nerve bloc";

pub(super) fn reference_engine() -> ScoringEngine {
    ScoringEngine::reference().expect("reference table is valid")
}

pub(super) fn band(min_score: u32, max_score: Option<u32>, level: u32) -> LevelBand {
    LevelBand {
        min_score,
        max_score,
        level,
        code: 99280 + level,
        criteria_id: 45099280 + level,
    }
}

pub(super) fn five_bands() -> Vec<LevelBand> {
    vec![
        band(0, Some(29), 1),
        band(30, Some(59), 2),
        band(60, Some(89), 3),
        band(90, Some(109), 4),
        band(110, None, 5),
    ]
}

pub(super) fn small_config(base_points: u32) -> ScoringConfig {
    ScoringConfig {
        base_points,
        match_threshold: 0.4,
        segmentation: Segmentation::Clauses,
        interventions: vec![
            RuleEntry::new("Wound Care", 10),
            RuleEntry::new("Enema", 15),
            RuleEntry::new("O2 cannula", 5),
            RuleEntry::new("Full bed bath", 20),
        ],
        levels: five_bands(),
    }
}

pub(super) fn small_engine(base_points: u32) -> ScoringEngine {
    ScoringEngine::new(small_config(base_points)).expect("small table is valid")
}

pub(super) fn phrases(engine: &ScoringEngine, note: &str) -> Vec<String> {
    engine
        .score(note)
        .matched_sources
        .into_iter()
        .map(|source| source.phrase)
        .collect()
}
