//! The case record collected during an intake interview.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use crate::domain::foundation::Timestamp;
use crate::schema_entity;

use super::FieldValue;

/// Status written into a freshly opened case.
pub const INTAKE_IN_PROGRESS: &str = "intake_in_progress";

schema_entity! {
    /// Identity and contact details of the client.
    pub struct PersonalInfo {
        description: "Personal information of the client: name, age, gender, date of birth, address and contact details",
        fields: {
            first_name: String => "First name of the client", ["John", "Jane"],
            last_name: String => "Last name of the client", ["Doe", "Smith"],
            age: u32 => "Age of the client in years", [30, 25],
            gender: String => "Gender of the client", ["Male", "Female", "Non-binary"],
            date_of_birth: NaiveDate => "Date of birth of the client", ["1990-01-01", "1985-05-15"],
            home_address: String => "Home address of the client", ["123 Main St, Anytown, USA"],
            email: String => "Email address of the client", ["jane.smith@example.com"],
            phone: String => "Phone number of the client", ["555-123-4567"],
            preferred_contact_method: String => "How the client prefers to be contacted", ["email", "phone"],
        },
        sections: {},
    }
}

schema_entity! {
    /// When, where and how the incident happened.
    pub struct IncidentDetails {
        description: "Details about the incident: date and time, location, description and type",
        fields: {
            incident_date: NaiveDateTime => "Date and time of the incident", ["2024-01-01T10:00:00"],
            incident_time: String => "Time of day of the incident", ["morning", "evening"],
            incident_location: String => "Where the incident took place", ["Corner of 5th and Main, Anytown"],
            incident_description: String => "The client's account of what happened", ["A car ran a red light and hit me"],
            incident_type: String => "Category of the incident", ["car accident", "slip and fall", "workplace"],
        },
        sections: {},
    }
}

schema_entity! {
    /// A witness to the incident.
    pub struct WitnessInfo {
        description: "Information about a witness to the incident, their contact details and statement",
        fields: {
            name: String => "Witness's full name", ["Mary Wilson"],
            contact_info: String => "Witness's phone or email", ["(555) 123-4567"],
            relationship: String => "Witness's relationship to the client", ["Friend", "Coworker", "Stranger"],
            statement: String => "What the witness says they saw", ["I saw the car run the light"],
        },
        sections: {},
    }
}

schema_entity! {
    /// Injuries and their effect on the client.
    pub struct InjuryDetails {
        description: "Injuries suffered, symptoms, severity, duration and impact on daily life",
        fields: {
            injuries: Vec<String> => "Every injury the client reports", [["Broken arm", "Concussion"]],
            symptoms: Vec<String> => "Symptoms the client experiences", [["Dizziness", "Swelling in the arm"]],
            severity: String => "Overall severity of the injuries", ["minor", "moderate", "severe"],
            duration: String => "How long the injuries have lasted", ["two weeks"],
            impact: String => "How the injuries affect the client's life", ["Unable to work"],
        },
        sections: {},
    }
}

schema_entity! {
    /// Treatment history.
    pub struct MedicalInfo {
        description: "Medical treatment history: facilities, physicians, current and future treatment",
        fields: {
            initial_treatment: String => "First treatment received after the incident", ["Went to the ER"],
            treatment_facilities: Vec<String> => "Facilities where the client was treated", [["Memorial Hospital"]],
            treating_physicians: Vec<String> => "Doctors treating the client", [["Dr. Smith"]],
            current_treatment: String => "Treatment the client is receiving now", ["Physical therapy twice a week"],
            future_treatment: String => "Treatment planned or expected", ["Surgery scheduled"],
            pre_existing_conditions: String => "Relevant conditions that predate the incident", ["Prior back injury", "None"],
            medications: Vec<String> => "Medications prescribed since the incident", [["Ibuprofen"]],
        },
        sections: {},
    }
}

schema_entity! {
    /// A single insurance policy.
    pub struct InsurancePolicy {
        description: "Insurance policy: provider, policy number, holder and coverage",
        fields: {
            company_name: String => "Insurance company name", ["Blue Cross Blue Shield"],
            policy_number: String => "Policy number", ["1234567890"],
            policy_holder_name: String => "Name of the policy holder", ["Jane Smith"],
            coverage_details: String => "What the policy covers", ["$100,000 per accident"],
            policy_start_date: NaiveDate => "Date the policy started", ["2024-01-01"],
            policy_end_date: NaiveDate => "Date the policy ends or ended", ["2025-01-01"],
            policy_type: String => "Kind of policy", ["Health", "Auto", "Home"],
            policy_status: String => "Whether the policy is active", ["Active", "Inactive"],
        },
        sections: {},
    }
}

schema_entity! {
    /// Insurance coverage and claim status.
    pub struct InsuranceInfo {
        description: "Insurance information: the client's policy, notification and claim status",
        fields: {
            insurance_notified: bool => "Whether the insurer has been notified", [true, false],
            notification_date: NaiveDate => "Date the insurer was notified", ["2024-01-03"],
            claim_number: String => "Insurance claim number", ["CLM-0042"],
            claim_status: String => "Status of the claim", ["Pending", "Closed"],
        },
        sections: {
            client_insurance: InsurancePolicy => "The client's own insurance policy",
        },
    }
}

schema_entity! {
    /// The client's employer.
    pub struct EmployerInfo {
        description: "The client's employer",
        fields: {
            company_name: String => "Employer name", ["Acme Inc."],
            address: String => "Employer address", ["456 Elm St, Othertown, USA"],
            phone: String => "Employer phone number", ["(555) 987-6543"],
        },
        sections: {},
    }
}

schema_entity! {
    /// Work situation and the injury's effect on it.
    pub struct EmploymentInfo {
        description: "Employment information: employer, position and effect of the injury on work",
        fields: {
            employment_status_at_incident: String => "Employment status when the incident happened", ["Employed", "Retired"],
            employment_type: String => "Kind of employment", ["Full-time", "Part-time"],
            position: String => "Job title", ["Sales Associate"],
            work_missed: bool => "Whether the client missed work because of the injury", [true, false],
            income_loss: bool => "Whether the client lost income because of the injury", [true, false],
            work_restrictions: String => "Restrictions on work caused by the injury", ["No lifting over 10 lbs"],
        },
        sections: {
            current_employer: EmployerInfo => "Current employer",
        },
    }
}

schema_entity! {
    /// Money the incident has cost or will cost.
    pub struct DamagesInfo {
        description: "Financial impact: medical costs, property damage, lost wages and other expenses",
        fields: {
            medical_expenses: f64 => "Total medical expenses so far", [5000.0, 12500.5],
            property_damage: f64 => "Total property damage", [2000.0],
            lost_wages: f64 => "Total wages lost", [3000.0],
            other_expenses: BTreeMap<String, f64> => "Other expenses by description", [{"Transportation": 500.0}],
            future_expenses: String => "Anticipated future expenses", ["Surgery estimated at $25,000"],
        },
        sections: {},
    }
}

schema_entity! {
    /// Legal history of the matter.
    pub struct LegalInfo {
        description: "Legal aspects: prior representation, signed documents, deadlines, offers and goals",
        fields: {
            prior_attorneys: String => "Attorneys consulted before", ["None"],
            signed_documents: String => "Legal documents already signed", ["Medical release form"],
            legal_deadlines: String => "Known deadlines or limitation periods", ["Claim deadline in 30 days"],
            settlement_offers: String => "Settlement offers received", ["No offers yet"],
            desired_outcome: String => "What the client hopes to achieve", ["Cover medical bills and lost wages"],
        },
        sections: {},
    }
}

schema_entity! {
    /// The complete case record for one client.
    pub struct CaseRecord {
        description: "Complete state of a client's case, from intake onwards",
        fields: {
            case_number: String => "Unique identifier for the case", ["5b8c0a6e-0f5e-4a43-9d8f-1f2c3d4e5f60"],
            intake_date: NaiveDate => "Date the intake was started", ["2024-02-01"],
            status: String => "Current status of the case", ["intake_in_progress"],
        },
        sections: {
            personal_info: PersonalInfo => "Personal information of the client",
            incident_details: IncidentDetails => "Details about the incident",
            witness_info: WitnessInfo => "Witness to the incident",
            injury_details: InjuryDetails => "Injuries and their impact",
            medical_info: MedicalInfo => "Medical treatment history",
            insurance_info: InsuranceInfo => "Insurance coverage and claims",
            employment_info: EmploymentInfo => "Employment and lost work",
            damages_info: DamagesInfo => "Financial impact of the incident",
            legal_info: LegalInfo => "Legal history and goals",
        },
    }
}

impl CaseRecord {
    /// A new case with its metadata filled in and every fact unset.
    pub fn open(now: Timestamp) -> Self {
        Self {
            case_number: FieldValue::set(uuid::Uuid::new_v4().to_string()),
            intake_date: FieldValue::set(now.date()),
            status: FieldValue::set(INTAKE_IN_PROGRESS.to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{
        completion, declared_fields, missing_fields, render_schema, FieldPath, SchemaNode,
    };

    #[test]
    fn default_record_is_entirely_missing() {
        let record = CaseRecord::default();
        assert_eq!(missing_fields(&record), declared_fields::<CaseRecord>());
    }

    #[test]
    fn open_fills_only_metadata() {
        let record = CaseRecord::open(Timestamp::now());
        let missing = missing_fields(&record);

        assert!(!missing.contains(&FieldPath::from("case_number")));
        assert!(!missing.contains(&FieldPath::from("status")));
        assert!(missing.contains(&FieldPath::from("personal_info.first_name")));
        assert_eq!(record.status.value().map(String::as_str), Some(INTAKE_IN_PROGRESS));
    }

    #[test]
    fn nested_sections_produce_dotted_paths() {
        let fields = declared_fields::<CaseRecord>();
        assert!(fields.contains(&FieldPath::from("insurance_info.client_insurance.policy_number")));
        assert!(fields.contains(&FieldPath::from("employment_info.current_employer.phone")));
        assert!(!fields.contains(&FieldPath::from("insurance_info.client_insurance")));
    }

    #[test]
    fn confirmed_empty_answer_is_not_missing() {
        let mut record = CaseRecord::default();
        record.medical_info.medications = FieldValue::set(Vec::new());
        record.legal_info.prior_attorneys = FieldValue::set(String::new());

        let missing = missing_fields(&record);
        assert!(!missing.contains(&FieldPath::from("medical_info.medications")));
        assert!(!missing.contains(&FieldPath::from("legal_info.prior_attorneys")));
    }

    #[test]
    fn schema_has_no_titles_or_references() {
        let rendered = render_schema::<CaseRecord>().to_prompt_json();
        assert!(!rendered.contains("\"title\""));
        assert!(!rendered.contains("$defs"));
        assert!(!rendered.contains("$ref"));
        assert!(rendered.contains("First name of the client"));
    }

    #[test]
    fn schema_rendering_is_stable() {
        assert_eq!(render_schema::<CaseRecord>(), render_schema::<CaseRecord>());
        assert_eq!(
            render_schema::<CaseRecord>().to_prompt_json(),
            render_schema::<CaseRecord>().to_prompt_json()
        );
    }

    #[test]
    fn sections_are_inlined() {
        let schema = render_schema::<CaseRecord>();
        match schema.schema.properties.get("insurance_info") {
            Some(SchemaNode::Section(section)) => {
                assert!(matches!(
                    section.properties.get("client_insurance"),
                    Some(SchemaNode::Section(_))
                ));
            }
            other => panic!("expected section, got {:?}", other),
        }
    }

    #[test]
    fn json_schema_marks_leaves_nullable() {
        let schema = render_schema::<CaseRecord>().to_json_schema();
        let first_name = &schema["properties"]["personal_info"]["properties"]["first_name"];
        assert_eq!(first_name["type"], serde_json::json!(["string", "null"]));
        let dob = &schema["properties"]["personal_info"]["properties"]["date_of_birth"];
        assert_eq!(dob["format"], "date");
    }

    #[test]
    fn completion_counts_filled_fields() {
        let mut record = CaseRecord::default();
        record.personal_info.first_name = FieldValue::set("Jane".to_string());
        let progress = completion(&record);

        assert_eq!(progress.filled, 1);
        assert_eq!(progress.total, declared_fields::<CaseRecord>().len());
        assert!(!progress.is_complete());
    }

    #[test]
    fn record_round_trips_through_json() {
        let mut record = CaseRecord::open(Timestamp::now());
        record.damages_info.other_expenses =
            FieldValue::set([("Home care".to_string(), 1200.0)].into_iter().collect());
        let value = serde_json::to_value(&record).unwrap();

        assert!(value["personal_info"]["first_name"].is_null());
        let back: CaseRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
