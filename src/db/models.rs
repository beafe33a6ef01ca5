use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// User document as stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// References to the user's assessments, in save order
    #[serde(default)]
    pub assessments: Vec<ObjectId>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl UserDoc {
    pub fn new(username: String, email: String, token: Option<String>) -> Self {
        let now = bson::DateTime::now();
        Self {
            id: None,
            username,
            email,
            token,
            assessments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Ownership check used before any per-assessment operation
    pub fn owns(&self, assessment_id: &ObjectId) -> bool {
        self.assessments.contains(assessment_id)
    }
}

/// Assessment document as stored in MongoDB.
///
/// The payload is an opaque JSON string so the stored shape can evolve
/// without database migrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub data: String,
    pub date_and_time: bson::DateTime,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl AssessmentDoc {
    pub fn new(data: String) -> Self {
        let now = bson::DateTime::now();
        Self {
            id: None,
            data,
            date_and_time: now,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User as returned over the API (string id, RFC3339 timestamps)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub assessments: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<UserDoc> for UserResponse {
    fn from(doc: UserDoc) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            username: doc.username,
            email: doc.email,
            assessments: doc.assessments.iter().map(|id| id.to_hex()).collect(),
            created_at: rfc3339(doc.created_at),
            updated_at: rfc3339(doc.updated_at),
        }
    }
}

/// Assessment as returned over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: String,
    pub data: String,
    #[serde(rename = "dateAndTime")]
    pub date_and_time: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<AssessmentDoc> for AssessmentRecord {
    fn from(doc: AssessmentDoc) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            data: doc.data,
            date_and_time: rfc3339(doc.date_and_time),
            created_at: rfc3339(doc.created_at),
            updated_at: rfc3339(doc.updated_at),
        }
    }
}

fn rfc3339(ts: bson::DateTime) -> String {
    ts.try_to_rfc3339_string().unwrap_or_default()
}
