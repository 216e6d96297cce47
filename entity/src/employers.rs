use serde::{Deserialize, Serialize};

/// A single employee record.
///
/// The serde keys (`firstname`, `lastname`, ...) are the data-transfer names
/// and are independent of the GraphQL field names exposed by the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Employer {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i32,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub gender: String,
    pub position: String,
    #[serde(default)]
    pub salary: i32,
}

fn is_zero(id: &i32) -> bool {
    *id == 0
}

impl Employer {
    /// A zero-valued record stands in for "no such employer" on mutations.
    pub fn is_empty(&self) -> bool {
        self.id == 0
    }

    fn seed(id: i32, first_name: &str, last_name: &str, gender: &str, position: &str) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            gender: gender.into(),
            position: position.into(),
            salary: 0,
        }
    }
}

/// Input for creating a record. The id is assigned by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewEmployer {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub position: String,
    pub salary: i32,
}

impl NewEmployer {
    pub fn new(first_name: impl Into<String>, salary: i32) -> Self {
        Self {
            first_name: first_name.into(),
            salary,
            ..Self::default()
        }
    }

    pub fn into_employer(self, id: i32) -> Employer {
        Employer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            gender: self.gender,
            position: self.position,
            salary: self.salary,
        }
    }
}

/// Partial update; `None` leaves the corresponding attribute untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployerPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub position: Option<String>,
    pub salary: Option<i32>,
}

impl EmployerPatch {
    pub fn apply(self, target: &mut Employer) {
        if let Some(first_name) = self.first_name {
            target.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            target.last_name = last_name;
        }
        if let Some(gender) = self.gender {
            target.gender = gender;
        }
        if let Some(position) = self.position {
            target.position = position;
        }
        if let Some(salary) = self.salary {
            target.salary = salary;
        }
    }
}

/// The fixed records every fresh store starts with.
pub fn seed_employers() -> Vec<Employer> {
    vec![
        Employer::seed(100, "Anderson", "Stone", "male", "Boss"),
        Employer::seed(101, "Kate", "Lakritz", "female", "Secreataty"),
        Employer::seed(102, "Suzan", "Berke", "female", "Frontend"),
        Employer::seed(103, "Jacob", "Baloon", "male", "backend"),
        Employer::seed(104, "Fathe", "Snow", "male", "tester"),
        Employer::seed(105, "Rahid", "Spark", "male", "tester"),
        Employer::seed(106, "Elizabeth", "Scram", "female", "backend"),
    ]
}
