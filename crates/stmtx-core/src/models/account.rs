//! Account metadata extracted from a statement header.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel used when a field has no confident match.
pub const NOT_FOUND: &str = "Not Found";

/// Account metadata. Every field is always populated, possibly with a sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub bank_name: String,
    pub account_holder_name: String,
    pub account_number: String,
    pub account_type: String,
    pub ifsc: String,
    pub micr: String,
    pub address: String,
}

/// Names of the account metadata fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountField {
    BankName,
    AccountHolderName,
    AccountNumber,
    AccountType,
    Ifsc,
    Micr,
    Address,
}

impl AccountField {
    /// All fields, in output column order.
    pub const ALL: [AccountField; 7] = [
        AccountField::BankName,
        AccountField::AccountHolderName,
        AccountField::AccountNumber,
        AccountField::AccountType,
        AccountField::Ifsc,
        AccountField::Micr,
        AccountField::Address,
    ];

    /// Output key of this field.
    pub fn key(&self) -> &'static str {
        match self {
            AccountField::BankName => "bank_name",
            AccountField::AccountHolderName => "account_holder_name",
            AccountField::AccountNumber => "account_number",
            AccountField::AccountType => "account_type",
            AccountField::Ifsc => "ifsc",
            AccountField::Micr => "micr",
            AccountField::Address => "address",
        }
    }

    /// Look up a field by its output key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl AccountInfo {
    /// Build a record with every field set to the same value.
    pub fn filled(value: &str) -> Self {
        Self {
            bank_name: value.to_string(),
            account_holder_name: value.to_string(),
            account_number: value.to_string(),
            account_type: value.to_string(),
            ifsc: value.to_string(),
            micr: value.to_string(),
            address: value.to_string(),
        }
    }

    /// Get a field value.
    pub fn get(&self, field: AccountField) -> &str {
        match field {
            AccountField::BankName => &self.bank_name,
            AccountField::AccountHolderName => &self.account_holder_name,
            AccountField::AccountNumber => &self.account_number,
            AccountField::AccountType => &self.account_type,
            AccountField::Ifsc => &self.ifsc,
            AccountField::Micr => &self.micr,
            AccountField::Address => &self.address,
        }
    }

    /// Set a field value.
    pub fn set(&mut self, field: AccountField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AccountField::BankName => self.bank_name = value,
            AccountField::AccountHolderName => self.account_holder_name = value,
            AccountField::AccountNumber => self.account_number = value,
            AccountField::AccountType => self.account_type = value,
            AccountField::Ifsc => self.ifsc = value,
            AccountField::Micr => self.micr = value,
            AccountField::Address => self.address = value,
        }
    }

    /// Key/value view in output column order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        AccountField::ALL
            .iter()
            .map(|f| (f.key(), self.get(*f)))
            .collect()
    }
}

impl Default for AccountInfo {
    fn default() -> Self {
        Self::filled(NOT_FOUND)
    }
}

/// Where a field value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// A pattern matched the document text.
    Matched,
    /// No pattern matched; the layout default was used.
    Default,
    /// Extraction failed internally; the whole record is the layout fallback.
    Fallback,
}

/// Account metadata together with per-field provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountExtraction {
    pub info: AccountInfo,
    pub provenance: BTreeMap<AccountField, Provenance>,
    /// Set when extraction failed and `info` is the static fallback record.
    pub degraded: bool,
}

impl AccountExtraction {
    /// A degraded extraction carrying the given fallback record.
    pub fn fallback(info: AccountInfo) -> Self {
        let provenance = AccountField::ALL
            .iter()
            .map(|f| (*f, Provenance::Fallback))
            .collect();
        Self {
            info,
            provenance,
            degraded: true,
        }
    }

    /// Provenance of a field; fields never recorded count as defaults.
    pub fn provenance_of(&self, field: AccountField) -> Provenance {
        self.provenance
            .get(&field)
            .copied()
            .unwrap_or(Provenance::Default)
    }

    /// Fields whose value came from the document text.
    pub fn matched_fields(&self) -> Vec<AccountField> {
        AccountField::ALL
            .into_iter()
            .filter(|f| self.provenance_of(*f) == Provenance::Matched)
            .collect()
    }
}
