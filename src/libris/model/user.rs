use super::{Fields, LineCodec, DELIMITER};
use crate::error::{LibrisError, Result};
use serde::Serialize;
use std::fmt;

const STUDENT_TAG: &str = "STUDENT";
const TEACHER_TAG: &str = "TEACHER";
const USER_TAG: &str = "USER";
const OTHER_TAG: &str = "OTHER";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Teacher,
    Other,
}

impl UserType {
    pub fn tag(&self) -> &'static str {
        match self {
            UserType::Student => STUDENT_TAG,
            UserType::Teacher => TEACHER_TAG,
            UserType::Other => OTHER_TAG,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserType::Student => "Student",
            UserType::Teacher => "Teacher",
            UserType::Other => "Other",
        }
    }

    /// Embedded type string of a base `USER` line. Anything unrecognized is `Other`.
    fn from_embedded_tag(tag: &str) -> Self {
        match tag {
            STUDENT_TAG => UserType::Student,
            TEACHER_TAG => UserType::Teacher,
            _ => UserType::Other,
        }
    }
}

/// Variant-specific part of a patron.
///
/// `Base` is the plain patron. It normally carries `UserType::Other`, but a `USER` line in
/// the users file may name any type, and that type is kept as read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Profile {
    Student { major: String },
    Teacher { department: String },
    Base { user_type: UserType },
}

impl Profile {
    pub fn user_type(&self) -> UserType {
        match self {
            Profile::Student { .. } => UserType::Student,
            Profile::Teacher { .. } => UserType::Teacher,
            Profile::Base { user_type } => *user_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    id: String,
    name: String,
    profile: Profile,
    fees_due: f64,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, profile: Profile) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            profile,
            fees_due: 0.0,
        }
    }

    pub fn student(
        id: impl Into<String>,
        name: impl Into<String>,
        major: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            name,
            Profile::Student {
                major: major.into(),
            },
        )
    }

    pub fn teacher(
        id: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            name,
            Profile::Teacher {
                department: department.into(),
            },
        )
    }

    pub fn other(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            Profile::Base {
                user_type: UserType::Other,
            },
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn user_type(&self) -> UserType {
        self.profile.user_type()
    }

    pub fn fees_due(&self) -> f64 {
        self.fees_due
    }

    /// Adds to the balance. Callers pass non-negative amounts.
    pub fn add_fees(&mut self, amount: f64) {
        self.fees_due += amount;
    }

    /// Pays down the balance. Paying more than is owed is an error and changes nothing.
    pub fn pay_fees(&mut self, amount: f64) -> Result<()> {
        if amount > self.fees_due {
            return Err(LibrisError::Overpayment {
                amount,
                owed: self.fees_due,
            });
        }
        self.fees_due -= amount;
        Ok(())
    }
}

impl LineCodec for User {
    fn encode(&self) -> String {
        let (tag, detail) = match &self.profile {
            Profile::Student { major } => (STUDENT_TAG, major.as_str()),
            Profile::Teacher { department } => (TEACHER_TAG, department.as_str()),
            Profile::Base { user_type } => (USER_TAG, user_type.tag()),
        };
        let fees = self.fees_due.to_string();
        [tag, self.id.as_str(), self.name.as_str(), detail, fees.as_str()]
            .join(&DELIMITER.to_string())
    }

    fn decode(line: &str) -> Result<Self> {
        let mut fields = Fields::new(line);
        let tag = fields.text("tag")?;
        let id = fields.text("id")?;
        let name = fields.text("name")?;
        let detail = fields.text("type detail")?;
        let profile = match tag {
            STUDENT_TAG => Profile::Student {
                major: detail.to_string(),
            },
            TEACHER_TAG => Profile::Teacher {
                department: detail.to_string(),
            },
            USER_TAG => Profile::Base {
                user_type: UserType::from_embedded_tag(detail),
            },
            other => return Err(fields.error(format!("unknown user tag '{}'", other))),
        };
        let fees_due: f64 = fields
            .number("fees")?
            .ok_or_else(|| fields.error("missing fees".to_string()))?;
        if !fees_due.is_finite() || fees_due < 0.0 {
            return Err(fields.error(format!("invalid fees '{}'", fees_due)));
        }

        let mut user = User::new(id, name, profile);
        user.add_fees(fees_due);
        Ok(user)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "User ID: {}", self.id)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Type: {}", self.user_type().label())?;
        write!(f, "Fees Due: ${:.2}", self.fees_due)?;
        match &self.profile {
            Profile::Student { major } => write!(f, "\nMajor: {}", major),
            Profile::Teacher { department } => write!(f, "\nDepartment: {}", department),
            Profile::Base { .. } => Ok(()),
        }
    }
}
