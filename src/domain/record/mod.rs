//! Record module - The structured record built up during an interview.
//!
//! # Module Organization
//!
//! - `field` - `FieldValue` slots with an explicit unset sentinel
//! - `schema` - Schema rendering and completeness checks
//! - `case` - Case entities (personal, incident, medical, ...)
//! - `profile` - General user profile
//! - `kind` - Entity and namespace kinds

mod case;
mod field;
mod kind;
mod macros;
mod profile;
mod schema;

pub use case::{
    CaseRecord, DamagesInfo, EmployerInfo, EmploymentInfo, IncidentDetails, InjuryDetails,
    InsuranceInfo, InsurancePolicy, LegalInfo, MedicalInfo, PersonalInfo, WitnessInfo,
    INTAKE_IN_PROGRESS,
};
pub use field::{FieldType, FieldValue, SemanticType};
pub use kind::{EntityKind, NamespaceKind, PayloadError};
pub use profile::UserProfile;
pub use schema::{
    completion, declared_fields, fold_payloads, missing_fields, overlay, render_schema,
    EntitySchema, FieldPath, FieldSchema, Progress, SchemaDescription, SchemaEntity, SchemaNode,
};
