use serde::{Deserialize, Serialize};

/// A user registered locally through the form.
///
/// The serialized shape keeps the field names the stored payload has always
/// used (`nombre`, `telefono`), while the English names are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(rename = "nombre", alias = "name")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono", alias = "phone")]
    pub phone: String,
}

impl UserRecord {
    /// Builds a record from an already validated candidate, trimming every field.
    pub fn from_candidate(id: String, candidate: &Candidate) -> Self {
        Self {
            id,
            name: candidate.name.trim().to_string(),
            email: candidate.email.trim().to_string(),
            phone: candidate.phone.trim().to_string(),
        }
    }
}

/// Raw, untrimmed form input waiting to be validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

/// A user served by the remote directory. Extra fields in the payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
}
