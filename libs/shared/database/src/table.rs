use std::fmt;

/// The tables the clinic persists. Every storage call names one of these,
/// so there is no "unknown table" case to handle at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Appointments,
    Dentists,
    Patients,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Appointments => "appointments",
            Table::Dentists => "dentists",
            Table::Patients => "patients",
        }
    }

    /// PostgREST path for the table.
    pub fn rest_path(self) -> String {
        format!("/rest/v1/{}", self.name())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_paths() {
        assert_eq!(Table::Appointments.rest_path(), "/rest/v1/appointments");
        assert_eq!(Table::Dentists.rest_path(), "/rest/v1/dentists");
        assert_eq!(Table::Patients.to_string(), "patients");
    }
}
