use crate::utils::address::is_address;
use serde::{Deserialize, Serialize};

/// Call data value meaning "no call data".
pub const NO_DATA: &str = "0x";

fn no_data() -> String {
    NO_DATA.to_string()
}

/// A row of the batch form. Fields hold raw user input and are only checked
/// when the batch is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftTransaction {
    #[serde(default)]
    pub to: String,
    /// Native currency amount in ether units; empty means no value.
    #[serde(default)]
    pub value: String,
    #[serde(default = "no_data")]
    pub data: String,
}

impl Default for DraftTransaction {
    fn default() -> Self {
        Self {
            to: String::new(),
            value: String::new(),
            data: no_data(),
        }
    }
}

impl DraftTransaction {
    pub fn new(to: impl Into<String>, value: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            value: value.into(),
            data: data.into(),
        }
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    pub fn has_data(&self) -> bool {
        self.data != NO_DATA
    }

    /// Recipient is a well formed address and the row carries a value or call data.
    pub fn is_valid(&self) -> bool {
        is_address(&self.to) && (self.has_value() || self.has_data())
    }

    /// True for a row nobody has typed into yet.
    pub fn is_blank(&self) -> bool {
        self.to.is_empty() && !self.has_value() && !self.has_data()
    }

    pub fn apply(&mut self, field: TransactionField) {
        match field {
            TransactionField::To(to) => self.to = to,
            TransactionField::Value(value) => self.value = value,
            TransactionField::Data(data) => self.data = data,
        }
    }
}

/// A single field edit on a draft row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionField {
    To(String),
    Value(String),
    Data(String),
}
