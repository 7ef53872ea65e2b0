use super::table::{LevelBand, RuleEntry};

pub const REFERENCE_BASE_POINTS: u32 = 35;
pub const REFERENCE_MATCH_THRESHOLD: f64 = 0.4;

/// Charted interventions in table order. Earlier entries win distance ties.
const REFERENCE_INTERVENTIONS: &[(&str, u32)] = &[
    // Five point assessments
    ("Discharge discussion- straightforward", 5),
    ("Dressing change simple, wound recheck, suture removal", 5),
    ("Ice bag application", 5),
    ("Note for work/school", 5),
    ("O2 cannula", 5),
    ("RX Refill only- asymptomatic", 5),
    // Ten point assessments
    ("Apply Ace wrap/sling/splint/shoulder immobilizer/crutches", 10),
    ("Beside Ultrasound/Bladder scan", 10),
    (
        "Discharge/AMA (Against Medical Advice) discussion- moderate",
        10,
    ),
    ("Ear irrigation", 10),
    ("Fetal Heart Measurement", 10),
    ("Obtain clean catch urine", 10),
    ("Pacer interrogation", 10),
    ("Photography", 10),
    (
        "Procedures (Prep/Assist) for lac repair, I&D, FB Removal, Dental/Nerve block",
        10,
    ),
    (
        "\u{201c}Road Test\u{201d} Nurse walks with patient to evaluate O2 saturation and gait",
        10,
    ),
    ("Toileting assistance", 10),
    ("Visual acuity alone- (Snellen)", 10),
    ("Wound Care", 10),
    // Fifteen point assessments
    (
        "Administration of meds- PO/nasal/eye/transdermal/Suppository/Vaccine or IM/SC (any one)",
        15,
    ),
    ("Chaperoned exam- rectal/pelvic/breast/genital", 15),
    (
        "Diagnostic test Prep for 1 diagnostic test (lab, EKG, x-ray)",
        15,
    ),
    ("Emesis/incontinence care", 15),
    ("Enema", 15),
    ("Fluorescein stain/Eye irrigation", 15),
    ("Foley catheter; in & out catheters", 15),
    ("Interpreter", 15),
    ("Nebulizer treatment", 15),
    (
        "Procedures (prep/assist) such as joint asp/inj., simple fracture care",
        15,
    ),
    (
        "Social worker simple intervention/Mental health Routine Psych assessment",
        15,
    ),
    // Twenty point assessments
    (
        "Admin & monitoring of infusions or parental meds (IV, IO)",
        20,
    ),
    (
        "C-Spine precautions- Backboard/C-Collar placement or removal",
        20,
    ),
    ("Diagnostic test Prep (labs, EKG, x-ray) Any two", 20),
    (
        "Diagnostic test Prep for Special Imaging (CT, MRI, US, VQ scan) Any one",
        20,
    ),
    (
        "Discharge discussion-complex (multiple notes, extensive time spent)",
        20,
    ),
    ("Epistaxis", 20),
    ("Full bed bath", 20),
    ("Irrigation w/3-way Foley", 20),
    ("Port-a-cath/venous access (existing)", 20),
    (
        "Procedure, Complex (Prep/Assist), such as laceration repair, multiple fracture reduction",
        20,
    ),
    (
        "NG/PEG Tube placement/replacement/care Administration of charcoal",
        20,
    ),
    ("Seizure precautions", 20),
    // Thirty point assessments
    ("Blood Transfusion", 30),
    (
        "Diagnostic test Prep for greater than or equal to 3 tests (labs, EKG, x-ray)",
        30,
    ),
    (
        "Diagnostic test, prep for Special Imaging 2 or more (CT, MRI, US, VQ scan) or any one combined with Lab, X-ray, EKG",
        30,
    ),
    ("Moderate sedation", 30),
    (
        "Physical or chemical restraints/Sitter/Isolation/Suicidal/Psychotic",
        30,
    ),
    (
        "Procedures (Prep/Assist) such as central line insertion, gastric lavage, LP, paracentesis etc.",
        30,
    ),
    ("Sexual assault exam", 30),
    (
        "Social Worker, Extended (multiple notes), change in living situation",
        30,
    ),
    ("Titrating IV drips", 30),
    ("Trauma activation w/o critical care", 30),
];

/// ED evaluation-and-management levels, 99281 through 99285.
const REFERENCE_LEVELS: [LevelBand; 5] = [
    LevelBand {
        min_score: 0,
        max_score: Some(29),
        level: 1,
        code: 99281,
        criteria_id: 45099281,
    },
    LevelBand {
        min_score: 30,
        max_score: Some(59),
        level: 2,
        code: 99282,
        criteria_id: 45099282,
    },
    LevelBand {
        min_score: 60,
        max_score: Some(89),
        level: 3,
        code: 99283,
        criteria_id: 45099283,
    },
    LevelBand {
        min_score: 90,
        max_score: Some(109),
        level: 4,
        code: 99284,
        criteria_id: 45099284,
    },
    LevelBand {
        min_score: 110,
        max_score: None,
        level: 5,
        code: 99285,
        criteria_id: 45099285,
    },
];

pub(crate) fn reference_interventions() -> Vec<RuleEntry> {
    REFERENCE_INTERVENTIONS
        .iter()
        .map(|(phrase, points)| RuleEntry::new(*phrase, *points))
        .collect()
}

pub(crate) fn reference_levels() -> Vec<LevelBand> {
    REFERENCE_LEVELS.to_vec()
}
