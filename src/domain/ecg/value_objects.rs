use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Value Object - electrode placement of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, AsRefStr, Serialize, Deserialize)]
pub enum EcgLeadCode {
    #[display(fmt = "I")]
    #[strum(serialize = "I")]
    #[serde(rename = "I")]
    I,
    #[display(fmt = "II")]
    #[strum(serialize = "II")]
    #[serde(rename = "II")]
    II,
    #[display(fmt = "III")]
    #[strum(serialize = "III")]
    #[serde(rename = "III")]
    III,
    #[display(fmt = "aVR")]
    #[strum(serialize = "aVR")]
    #[serde(rename = "aVR")]
    AVR,
    #[display(fmt = "aVL")]
    #[strum(serialize = "aVL")]
    #[serde(rename = "aVL")]
    AVL,
    #[display(fmt = "aVF")]
    #[strum(serialize = "aVF")]
    #[serde(rename = "aVF")]
    AVF,
    #[display(fmt = "V1")]
    #[strum(serialize = "V1")]
    #[serde(rename = "V1")]
    V1,
    #[display(fmt = "V2")]
    #[strum(serialize = "V2")]
    #[serde(rename = "V2")]
    V2,
    #[display(fmt = "V3")]
    #[strum(serialize = "V3")]
    #[serde(rename = "V3")]
    V3,
    #[display(fmt = "V4")]
    #[strum(serialize = "V4")]
    #[serde(rename = "V4")]
    V4,
    #[display(fmt = "V5")]
    #[strum(serialize = "V5")]
    #[serde(rename = "V5")]
    V5,
    #[display(fmt = "V6")]
    #[strum(serialize = "V6")]
    #[serde(rename = "V6")]
    V6,
}

impl EcgLeadCode {
    /// Human readable labels in lead order.
    pub fn labels(leads: &[EcgLeadCode]) -> Vec<String> {
        leads.iter().map(|lead| lead.to_string()).collect()
    }
}

/// Value Object - boundary kind of an annotated wave point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EcgWavePointType {
    PStart,
    PPeak,
    PEnd,
    QrsStart,
    RPeak,
    QrsEnd,
    TStart,
    TPeak,
    TEnd,
}

/// Value Object - coded rhythm / quality event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EcgAnnotationCode {
    Normal,
    Supraventricular,
    Ventricular,
    AtrialFibrillation,
    Pause,
    Noise,
    Artifact,
}
