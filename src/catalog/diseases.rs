use serde::{Deserialize, Serialize};

/// A disease shown in the info panel when its related part is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    /// Disease id, unique within the catalog.
    pub id: String,
    /// Disease name; the panel title is `"<name> Information"`.
    pub display_name: String,
    /// Part id this disease belongs to. Not enforced: a dangling id just
    /// never matches.
    pub related_part_id: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Symptoms, in display order.
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Treatments, in display order.
    #[serde(default)]
    pub treatments: Vec<String>,
    /// When to see a clinician.
    #[serde(default)]
    pub consult_guidance: String,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

pub(super) fn builtin() -> Vec<DiseaseRecord> {
    vec![
        DiseaseRecord {
            id: "migraine".into(),
            display_name: "Migraine".into(),
            related_part_id: "head".into(),
            description: "Migraine is a type of headache that can cause \
                          severe throbbing pain or a pulsing sensation, \
                          usually on one side of the head."
                .into(),
            symptoms: owned(&[
                "Pulsating headache",
                "Nausea",
                "Vomiting",
                "Sensitivity to light and sound",
            ]),
            treatments: owned(&[
                "Pain relievers",
                "Triptans",
                "Anti-nausea medications",
                "Rest in a dark, quiet room",
            ]),
            consult_guidance: "If headaches are new, unusually severe, or \
                               accompanied by neurological symptoms like \
                               weakness, numbness, or vision changes."
                .into(),
        },
        DiseaseRecord {
            id: "asthma".into(),
            display_name: "Asthma".into(),
            related_part_id: "lungs_3d".into(),
            description: "Asthma is a chronic respiratory condition \
                          characterized by inflammation and narrowing of \
                          the airways, leading to difficulty breathing."
                .into(),
            symptoms: owned(&[
                "Wheezing",
                "Shortness of breath",
                "Coughing (especially at night or early morning)",
                "Chest tightness",
            ]),
            treatments: owned(&[
                "Inhalers (reliever and preventer)",
                "Oral corticosteroids",
                "Bronchodilators",
            ]),
            consult_guidance: "If symptoms worsen, if inhalers are needed \
                               more frequently, or if experiencing severe \
                               breathing difficulties."
                .into(),
        },
        DiseaseRecord {
            id: "heart_attack".into(),
            display_name: "Heart Attack".into(),
            related_part_id: "heart_3d".into(),
            description: "A heart attack occurs when blood flow to a part \
                          of the heart is blocked, usually by a blood clot."
                .into(),
            symptoms: owned(&[
                "Chest pain (pressure, tightness, squeezing)",
                "Shortness of breath",
                "Pain radiating to arm (left)",
                "Nausea",
            ]),
            treatments: owned(&[
                "Emergency medical care (aspirin, nitroglycerin, \
                 angioplasty, bypass surgery)",
            ]),
            consult_guidance: "IMMEDIATE EMERGENCY MEDICAL ATTENTION (call \
                               local emergency number) if experiencing \
                               symptoms."
                .into(),
        },
        DiseaseRecord {
            id: "gastritis".into(),
            display_name: "Gastritis".into(),
            related_part_id: "stomach_3d".into(),
            description: "Gastritis is an inflammation of the lining of the \
                          stomach, often caused by infection, stress, or \
                          certain medications."
                .into(),
            symptoms: owned(&[
                "Abdominal pain (burning or gnawing)",
                "Nausea",
                "Vomiting",
                "Feeling of fullness after eating",
            ]),
            treatments: owned(&[
                "Antacids",
                "Proton pump inhibitors (PPIs)",
                "Antibiotics (if bacterial infection)",
            ]),
            consult_guidance: "If symptoms persist, are severe, or \
                               accompanied by blood in vomit/stool."
                .into(),
        },
        DiseaseRecord {
            id: "kidney_stones".into(),
            display_name: "Kidney Stones".into(),
            related_part_id: "kidney_3d".into(),
            description: "Kidney stones are hard deposits made of minerals \
                          and salts that form inside your kidneys."
                .into(),
            symptoms: owned(&[
                "Severe pain in the side and back (below the ribs)",
                "Pain that radiates to lower abdomen and groin",
                "Painful urination",
                "Nausea",
                "Vomiting",
                "Blood in urine",
            ]),
            treatments: owned(&[
                "Increased fluid intake",
                "Pain relievers",
                "Medical procedures for removal (lithotripsy, surgery)",
            ]),
            consult_guidance: "If experiencing severe pain, fever, chills, or \
                               difficulty urinating."
                .into(),
        },
    ]
}
