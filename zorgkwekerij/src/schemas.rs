//! Declarative schemas for the four submission kinds.
//!
//! Each [`EntityKind`] carries a static table of [`FieldSpec`]s describing the
//! fields a submission may contain, whether they are required, and any format
//! constraint. Validation is pure: given an arbitrary JSON body it either
//! produces the cleaned field map that gets persisted, or the full list of
//! field violations so the client can fix everything in one round trip.

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// The four submission record types accepted by the API.
///
/// Every kind maps to exactly one collection in the document store; the
/// mapping is a static table rather than something derived from type names at
/// runtime, so an unknown collection can never be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    ClientApplication,
    PartnerInquiry,
    VolunteerApplication,
    ContactMessage,
}

/// Format constraint applied to a string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// Any string.
    Text,
    /// Standard email address syntax.
    Email,
}

/// One field in an entity schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub format: FieldFormat,
}

const fn required(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        required: true,
        format: FieldFormat::Text,
    }
}

const fn optional(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        required: false,
        format: FieldFormat::Text,
    }
}

const fn email(name: &'static str, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        required,
        format: FieldFormat::Email,
    }
}

/// Applications from clients interested in day activities.
const CLIENT_APPLICATION_FIELDS: &[FieldSpec] = &[
    required("first_name"),
    required("last_name"),
    email("email", false),
    optional("phone"),
    optional("date_of_birth"),
    optional("support_needs"),
    optional("preferred_days"),
    optional("message"),
];

/// Inquiries from professional care providers and partners.
const PARTNER_INQUIRY_FIELDS: &[FieldSpec] = &[
    required("organization"),
    required("contact_name"),
    email("email", true),
    optional("phone"),
    optional("referral_process_stage"),
    optional("target_group"),
    optional("message"),
];

/// Applications from volunteers.
const VOLUNTEER_APPLICATION_FIELDS: &[FieldSpec] = &[
    required("name"),
    email("email", false),
    optional("phone"),
    optional("interests"),
    optional("availability"),
    optional("motivation"),
];

/// General contact messages.
const CONTACT_MESSAGE_FIELDS: &[FieldSpec] = &[
    required("name"),
    email("email", false),
    optional("phone"),
    optional("subject"),
    required("message"),
];

/// A single field violation found during validation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct FieldError {
    /// Name of the offending field
    pub field: String,
    /// What was wrong with it
    pub reason: String,
}

impl FieldError {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl EntityKind {
    /// All kinds, in the order they appear in the API.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::ClientApplication,
        EntityKind::PartnerInquiry,
        EntityKind::VolunteerApplication,
        EntityKind::ContactMessage,
    ];

    /// Collection name in the document store.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::ClientApplication => "clientapplication",
            EntityKind::PartnerInquiry => "partnerinquiry",
            EntityKind::VolunteerApplication => "volunteerapplication",
            EntityKind::ContactMessage => "contactmessage",
        }
    }

    /// Resolve an allow-listed collection name back to its kind.
    ///
    /// Returns `None` for anything outside the four known collections; the
    /// read endpoint turns that into a client error.
    pub fn from_collection(name: &str) -> Option<EntityKind> {
        EntityKind::ALL.iter().copied().find(|kind| kind.collection() == name)
    }

    /// The declarative field table for this kind.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            EntityKind::ClientApplication => CLIENT_APPLICATION_FIELDS,
            EntityKind::PartnerInquiry => PARTNER_INQUIRY_FIELDS,
            EntityKind::VolunteerApplication => VOLUNTEER_APPLICATION_FIELDS,
            EntityKind::ContactMessage => CONTACT_MESSAGE_FIELDS,
        }
    }

    /// Validate an arbitrary JSON body against this kind's schema.
    ///
    /// On success, returns the cleaned field map: declared fields only, in
    /// schema order, with absent optionals omitted. On failure, returns one
    /// [`FieldError`] per violation so the response names every offending
    /// field at once. `null` counts as absent.
    pub fn validate(&self, body: &Value) -> Result<Map<String, Value>, Vec<FieldError>> {
        let Some(object) = body.as_object() else {
            return Err(vec![FieldError::new("body", "expected a JSON object")]);
        };

        let mut errors = Vec::new();
        let mut record = Map::new();

        for spec in self.fields() {
            match object.get(spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        errors.push(FieldError::new(spec.name, "field required"));
                    }
                }
                Some(Value::String(text)) => {
                    if spec.format == FieldFormat::Email && !is_valid_email(text) {
                        errors.push(FieldError::new(spec.name, "value is not a valid email address"));
                    } else {
                        record.insert(spec.name.to_string(), Value::String(text.clone()));
                    }
                }
                Some(_) => {
                    errors.push(FieldError::new(spec.name, "expected a string"));
                }
            }
        }

        if errors.is_empty() { Ok(record) } else { Err(errors) }
    }
}

/// Minimal email syntax check: exactly one `@`, a non-empty local part, and a
/// dotted domain without leading/trailing/empty labels or whitespace.
fn is_valid_email(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if address.chars().any(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    if !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}
