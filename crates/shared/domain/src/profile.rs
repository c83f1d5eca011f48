//! User profile document as the identity collaborator stores it.
//!
//! Field names on the wire stay exactly as the collaborator schema defines
//! them (Portuguese, camelCase). The password pair is deliberately absent
//! from [`UserProfile`]: credentials travel only on the account-creation
//! request and are never part of the persisted document.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Self-declared gender, with the collaborator's wire labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter)]
pub enum Gender {
    #[serde(rename = "Masculino")]
    #[strum(serialize = "Masculino")]
    Male,
    #[serde(rename = "Feminino")]
    #[strum(serialize = "Feminino")]
    Female,
    #[serde(rename = "Outro")]
    #[strum(serialize = "Outro")]
    Other,
    #[serde(rename = "Prefiro não informar")]
    #[strum(serialize = "Prefiro não informar")]
    Undisclosed,
}

/// Nationality selector offered by the enrollment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter)]
pub enum Nationality {
    #[serde(rename = "Brasileira")]
    #[strum(serialize = "Brasileira")]
    Brazilian,
    #[serde(rename = "Estrangeira")]
    #[strum(serialize = "Estrangeira")]
    Foreign,
}

/// References to the three uploaded identity documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSet {
    pub rg_front: String,
    pub rg_back: String,
    pub address_proof: String,
}

/// A registered user's profile document.
///
/// `id` is the collaborator-assigned document id and is absent until the
/// document has been stored; `uid` ties the document to its account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub uid: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub rg: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(rename = "dataNascimento")]
    pub birth_date: NaiveDate,
    #[serde(rename = "nacionalidade")]
    pub nationality: Nationality,
    #[serde(rename = "genero")]
    pub gender: Gender,
    pub cep: String,
    #[serde(rename = "logradouro")]
    pub street: String,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "complemento", default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    #[serde(rename = "bairro")]
    pub district: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "estado")]
    pub state: String,
    pub is_admin: bool,
    #[serde(rename = "dataCadastro")]
    pub registered_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<DocumentSet>,
}
