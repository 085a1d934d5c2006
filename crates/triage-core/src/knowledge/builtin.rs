//! Compiled-in clinical knowledge tables.
//!
//! Ordered tables are scanned first-hit-wins, so entry order is part of the
//! behavior: more specific keys ("severe headache") must precede the keys
//! they contain ("headache").

use std::collections::BTreeMap;

use super::{
    AgeMultiplierBand, AliasTables, ContraindicationProfile, DrugMonograph, InteractionProfile,
    KeywordSpecializations, KnowledgeBase, SymptomConditions, WeightedKeyword,
};

impl KnowledgeBase {
    /// The default knowledge base shipped with the engine.
    pub fn builtin() -> Self {
        Self {
            symptom_conditions: symptom_conditions(),
            emergency_keywords: strings(&[
                "severe",
                "intense",
                "crushing",
                "sudden",
                "acute",
                "blood",
                "bleeding",
                "unconscious",
                "difficulty breathing",
                "chest pain",
                "heart attack",
                "stroke",
            ]),
            red_flag_symptoms: strings(&[
                "severe chest pain",
                "difficulty breathing",
                "loss of consciousness",
                "severe headache",
                "high fever",
                "severe abdominal pain",
                "blood in stool",
                "blood in urine",
                "severe allergic reaction",
                "stroke symptoms",
                "heart attack symptoms",
            ]),
            symptom_specializations: symptom_specializations(),
            condition_specializations: condition_specializations(),
            default_specialization: "general_medicine".into(),
            symptom_weights: symptom_weights(),
            high_risk_conditions: high_risk_conditions(),
            age_bands: age_bands(),
            high_risk_history: strings(&[
                "diabetes",
                "hypertension",
                "heart disease",
                "cancer",
                "kidney disease",
                "liver disease",
                "autoimmune",
                "copd",
                "asthma",
                "stroke",
                "heart attack",
            ]),
            aliases: AliasTables {
                symptom: symptom_aliases(),
                drug: drug_aliases(),
                condition: condition_aliases(),
            },
            interactions: interactions(),
            contraindications: contraindications(),
            drug_classes: drug_classes(),
            monographs: monographs(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn symptom_conditions() -> Vec<SymptomConditions> {
    let entry = |symptom: &str, conditions: &[&str]| SymptomConditions {
        symptom: symptom.into(),
        conditions: strings(conditions),
    };

    vec![
        entry("fever", &["viral infection", "bacterial infection", "flu", "covid-19"]),
        entry("cough", &["cold", "flu", "pneumonia", "bronchitis", "covid-19"]),
        entry("headache", &["tension headache", "migraine", "sinusitis", "hypertension"]),
        entry("chest pain", &["heart attack", "angina", "pneumonia", "acid reflux"]),
        entry("shortness of breath", &["asthma", "pneumonia", "heart failure", "anxiety"]),
        entry("nausea", &["gastroenteritis", "food poisoning", "pregnancy", "migraine"]),
        entry("vomiting", &["gastroenteritis", "food poisoning", "appendicitis", "migraine"]),
        entry("abdominal pain", &["appendicitis", "gastroenteritis", "gallstones", "ulcer"]),
        entry("diarrhea", &["gastroenteritis", "food poisoning", "IBS", "infection"]),
        entry("fatigue", &["anemia", "depression", "thyroid disorder", "chronic fatigue syndrome"]),
        entry("dizziness", &["vertigo", "low blood pressure", "dehydration", "inner ear infection"]),
        entry("rash", &["allergic reaction", "eczema", "viral infection", "contact dermatitis"]),
        entry("joint pain", &["arthritis", "injury", "autoimmune disorder", "infection"]),
        entry("back pain", &["muscle strain", "herniated disc", "arthritis", "kidney stones"]),
        entry("sore throat", &["viral infection", "strep throat", "allergies", "acid reflux"]),
    ]
}

fn symptom_specializations() -> Vec<KeywordSpecializations> {
    let entry = |keyword: &str, specs: &[&str]| KeywordSpecializations {
        keyword: keyword.into(),
        specializations: strings(specs),
    };

    vec![
        entry("heart", &["cardiology"]),
        entry("chest", &["cardiology", "pulmonology"]),
        entry("lung", &["pulmonology"]),
        entry("stomach", &["gastroenterology"]),
        entry("abdominal", &["gastroenterology"]),
        entry("skin", &["dermatology"]),
        entry("joint", &["rheumatology", "orthopedics"]),
        entry("bone", &["orthopedics"]),
        entry("neurological", &["neurology"]),
        entry("mental", &["psychiatry", "psychology"]),
        entry("eye", &["ophthalmology"]),
        entry("ear", &["ENT"]),
        entry("throat", &["ENT"]),
        entry("kidney", &["nephrology"]),
        entry("diabetes", &["endocrinology"]),
    ]
}

fn condition_specializations() -> Vec<KeywordSpecializations> {
    let entry = |keyword: &str, specs: &[&str]| KeywordSpecializations {
        keyword: keyword.into(),
        specializations: strings(specs),
    };

    vec![
        entry("heart", &["cardiology"]),
        entry("cardiac", &["cardiology"]),
        entry("lung", &["pulmonology"]),
        entry("respiratory", &["pulmonology"]),
        entry("gastro", &["gastroenterology"]),
        entry("stomach", &["gastroenterology"]),
        entry("skin", &["dermatology"]),
        entry("joint", &["rheumatology"]),
        entry("bone", &["orthopedics"]),
        entry("neuro", &["neurology"]),
        entry("mental", &["psychiatry"]),
        entry("diabetes", &["endocrinology"]),
        entry("kidney", &["nephrology"]),
    ]
}

fn symptom_weights() -> Vec<WeightedKeyword> {
    let entry = |keyword: &str, weight: u8| WeightedKeyword {
        keyword: keyword.into(),
        weight,
    };

    vec![
        entry("chest pain", 85),
        entry("difficulty breathing", 80),
        entry("severe headache", 75),
        entry("blood in stool", 70),
        entry("blood in urine", 70),
        entry("high fever", 65),
        entry("severe abdominal pain", 65),
        entry("loss of consciousness", 95),
        entry("stroke symptoms", 95),
        entry("heart attack symptoms", 95),
        entry("severe allergic reaction", 90),
        entry("shortness of breath", 60),
        entry("persistent cough", 40),
        entry("nausea", 30),
        entry("headache", 35),
        entry("fatigue", 25),
        entry("mild fever", 30),
        entry("sore throat", 20),
        entry("runny nose", 15),
    ]
}

fn high_risk_conditions() -> Vec<WeightedKeyword> {
    let entry = |keyword: &str, weight: u8| WeightedKeyword {
        keyword: keyword.into(),
        weight,
    };

    vec![
        entry("heart attack", 95),
        entry("stroke", 95),
        entry("pulmonary embolism", 90),
        entry("sepsis", 90),
        entry("anaphylaxis", 90),
        entry("pneumonia", 70),
        entry("appendicitis", 75),
        entry("meningitis", 85),
        entry("diabetic ketoacidosis", 80),
    ]
}

fn age_bands() -> Vec<AgeMultiplierBand> {
    let band = |min_age: u32, max_age: u32, multiplier: f64| AgeMultiplierBand {
        min_age,
        max_age,
        multiplier,
    };

    vec![
        band(0, 2, 1.3),   // infants
        band(2, 12, 1.1),  // children
        band(12, 18, 1.0), // adolescents
        band(18, 65, 1.0), // adults
        band(65, 80, 1.2), // elderly
        band(80, 120, 1.4), // very elderly
    ]
}

fn symptom_aliases() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    map.insert("sob".into(), "shortness of breath".into());
    map.insert("dyspnea".into(), "shortness of breath".into());
    map.insert("h/a".into(), "headache".into());
    map.insert("pyrexia".into(), "fever".into());
    map.insert("emesis".into(), "vomiting".into());

    map
}

fn drug_aliases() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    // Analgesics
    map.insert("paracetamol".into(), "acetaminophen".into());
    map.insert("tylenol".into(), "acetaminophen".into());
    map.insert("advil".into(), "ibuprofen".into());
    map.insert("motrin".into(), "ibuprofen".into());
    map.insert("aleve".into(), "naproxen".into());

    // Anticoagulants
    map.insert("coumadin".into(), "warfarin".into());

    // Diabetes
    map.insert("glucophage".into(), "metformin".into());

    // ACE inhibitors
    map.insert("prinivil".into(), "lisinopril".into());
    map.insert("zestril".into(), "lisinopril".into());

    // Statins
    map.insert("zocor".into(), "simvastatin".into());

    map
}

fn condition_aliases() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    map.insert("kidney_failure".into(), "kidney_disease_severe".into());
    map.insert("renal_failure".into(), "kidney_disease_severe".into());
    map.insert("liver_failure".into(), "liver_disease".into());
    map.insert("hepatic_failure".into(), "liver_disease".into());
    map.insert("heart_failure".into(), "heart_failure_severe".into());
    map.insert("congestive_heart_failure".into(), "heart_failure_severe".into());
    map.insert("bleeding".into(), "active_bleeding".into());
    map.insert("hemorrhage".into(), "active_bleeding".into());

    map
}

fn interactions() -> BTreeMap<String, InteractionProfile> {
    let profile = |major: &[&str], moderate: &[&str], effects: &[(&str, &str)]| {
        InteractionProfile {
            major: strings(major),
            moderate: strings(moderate),
            minor: Vec::new(),
            effects: effects
                .iter()
                .map(|(drug, effect)| (drug.to_string(), effect.to_string()))
                .collect(),
        }
    };

    let mut map = BTreeMap::new();

    map.insert(
        "warfarin".into(),
        profile(
            &[
                "aspirin",
                "ibuprofen",
                "naproxen",
                "diclofenac",
                "amiodarone",
                "fluconazole",
                "metronidazole",
            ],
            &["acetaminophen", "omeprazole", "simvastatin"],
            &[
                ("aspirin", "Increased bleeding risk"),
                ("ibuprofen", "Increased bleeding risk"),
                ("amiodarone", "Increased anticoagulation effect"),
            ],
        ),
    );
    map.insert(
        "metformin".into(),
        profile(
            &["contrast_dye", "alcohol"],
            &["furosemide", "nifedipine", "prednisone"],
            &[
                ("contrast_dye", "Risk of lactic acidosis"),
                ("alcohol", "Risk of lactic acidosis"),
            ],
        ),
    );
    map.insert(
        "lisinopril".into(),
        profile(
            &["potassium_supplements", "spironolactone", "amiloride"],
            &["ibuprofen", "naproxen", "lithium"],
            &[
                ("potassium_supplements", "Hyperkalemia risk"),
                ("ibuprofen", "Reduced antihypertensive effect"),
            ],
        ),
    );
    map.insert(
        "simvastatin".into(),
        profile(
            &["gemfibrozil", "cyclosporine", "danazol"],
            &["amlodipine", "diltiazem", "verapamil"],
            &[
                ("gemfibrozil", "Increased risk of myopathy"),
                ("cyclosporine", "Increased risk of rhabdomyolysis"),
            ],
        ),
    );

    map
}

fn contraindications() -> BTreeMap<String, ContraindicationProfile> {
    let profile = |absolute: &[&str], relative: &[&str]| ContraindicationProfile {
        absolute: strings(absolute),
        relative: strings(relative),
    };

    let mut map = BTreeMap::new();

    map.insert(
        "warfarin".into(),
        profile(
            &["active_bleeding", "severe_liver_disease", "pregnancy"],
            &["recent_surgery", "peptic_ulcer", "hypertension_uncontrolled"],
        ),
    );
    map.insert(
        "metformin".into(),
        profile(
            &["kidney_disease_severe", "liver_disease", "heart_failure_severe"],
            &["kidney_disease_moderate", "alcohol_abuse", "elderly_over_80"],
        ),
    );
    map.insert(
        "ace_inhibitors".into(),
        profile(
            &["pregnancy", "angioedema_history", "bilateral_renal_artery_stenosis"],
            &["kidney_disease", "hyperkalemia", "hypotension"],
        ),
    );

    map
}

fn drug_classes() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    map.insert("lisinopril".into(), "ace_inhibitors".into());
    map.insert("enalapril".into(), "ace_inhibitors".into());
    map.insert("captopril".into(), "ace_inhibitors".into());
    map.insert("ramipril".into(), "ace_inhibitors".into());

    map
}

fn monographs() -> BTreeMap<String, DrugMonograph> {
    let monograph = |side_effects: &[&str],
                     monitoring: &[&str],
                     food: &[&str],
                     pregnancy: &str| DrugMonograph {
        side_effects: strings(side_effects),
        monitoring: strings(monitoring),
        food_interactions: strings(food),
        pregnancy_category: Some(pregnancy.into()),
    };

    let mut map = BTreeMap::new();

    map.insert(
        "warfarin".into(),
        monograph(
            &["bleeding", "bruising", "nausea", "hair_loss"],
            &["INR", "PT", "bleeding_signs", "CBC"],
            &["vitamin_k_foods", "alcohol", "cranberry_juice"],
            "X",
        ),
    );
    map.insert(
        "metformin".into(),
        monograph(
            &["nausea", "diarrhea", "metallic_taste", "vitamin_b12_deficiency"],
            &["kidney_function", "liver_function", "vitamin_b12", "lactic_acid"],
            &["alcohol", "take_with_food"],
            "B",
        ),
    );
    map.insert(
        "lisinopril".into(),
        monograph(
            &["dry_cough", "dizziness", "hyperkalemia", "angioedema"],
            &["blood_pressure", "kidney_function", "potassium", "cough"],
            &["potassium_rich_foods", "salt_substitutes"],
            "D",
        ),
    );
    map.insert(
        "simvastatin".into(),
        monograph(
            &["muscle_pain", "liver_enzyme_elevation", "headache", "nausea"],
            &["liver_enzymes", "muscle_symptoms", "lipid_profile"],
            &["grapefruit_juice", "high_fat_meals"],
            "X",
        ),
    );

    map
}
