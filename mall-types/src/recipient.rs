use crate::null_as_default;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// User record as returned by the admin user listings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MallUser {
    #[serde(flatten)]
    pub contact: Contact,
    #[serde(default)]
    pub mall_user_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct UsersResponse<T> {
    pub ok: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<T>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ProspectsResponse {
    pub ok: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prospects: Vec<Contact>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[serde(rename_all = "kebab-case")]
pub enum RecipientKind {
    #[display("크루즈가이드")]
    CruiseGuide,
    #[display("크루즈몰")]
    Mall,
    #[display("테스트")]
    Test,
    #[display("잠재고객")]
    Prospect,
    #[display("직접 입력")]
    Direct,
}

/// Message recipient. Directory entries carry the listing's contact record;
/// `Direct` entries are typed in by the operator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Recipient {
    CruiseGuide(Contact),
    Mall {
        #[serde(flatten)]
        contact: Contact,
        #[serde(rename = "mallUserId")]
        mall_user_id: Option<String>,
    },
    Test(Contact),
    Prospect(Contact),
    Direct { address: DirectAddress },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DirectAddress {
    Email(String),
    Phone(String),
}

/// Identity used when toggling selections: directory id per kind, or the
/// typed address for direct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecipientKey {
    Listed(RecipientKind, i64),
    Direct(DirectAddress),
}

impl Recipient {
    pub fn kind(&self) -> RecipientKind {
        match self {
            Self::CruiseGuide(_) => RecipientKind::CruiseGuide,
            Self::Mall { .. } => RecipientKind::Mall,
            Self::Test(_) => RecipientKind::Test,
            Self::Prospect(_) => RecipientKind::Prospect,
            Self::Direct { .. } => RecipientKind::Direct,
        }
    }

    pub fn contact(&self) -> Option<&Contact> {
        match self {
            Self::CruiseGuide(c) | Self::Test(c) | Self::Prospect(c) => Some(c),
            Self::Mall { contact, .. } => Some(contact),
            Self::Direct { .. } => None,
        }
    }

    pub fn key(&self) -> RecipientKey {
        match self {
            Self::Direct { address } => RecipientKey::Direct(address.clone()),
            other => RecipientKey::Listed(
                other.kind(),
                other.contact().map(|c| c.id).unwrap_or_default(),
            ),
        }
    }

    pub fn phone(&self) -> Option<&str> {
        match self {
            Self::Direct {
                address: DirectAddress::Phone(p),
            } => Some(p),
            Self::Direct {
                address: DirectAddress::Email(_),
            } => None,
            other => other.contact().and_then(|c| c.phone.as_deref()),
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Direct {
                address: DirectAddress::Email(e),
            } => Some(e),
            Self::Direct {
                address: DirectAddress::Phone(_),
            } => None,
            other => other.contact().and_then(|c| c.email.as_deref()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "kebab-case")]
pub enum SendMethod {
    #[display("cruise-guide")]
    CruiseGuide,
    #[display("email")]
    Email,
    #[display("sms")]
    Sms,
    #[display("kakao")]
    Kakao,
}

impl SendMethod {
    pub fn parse<S: AsRef<str>>(s: S) -> Option<Self> {
        match s.as_ref().to_lowercase().as_str() {
            "cruise-guide" => Some(Self::CruiseGuide),
            "email" => Some(Self::Email),
            "sms" => Some(Self::Sms),
            "kakao" => Some(Self::Kakao),
            _ => None,
        }
    }

    /// Category preselected when the operator switches to this method.
    pub fn default_category(&self) -> RecipientCategory {
        match self {
            Self::CruiseGuide => RecipientCategory::CruiseGuide,
            Self::Email => RecipientCategory::Mall,
            Self::Sms | Self::Kakao => RecipientCategory::All,
        }
    }

    pub fn requires_phone(&self) -> bool {
        !matches!(self, Self::Email)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RecipientCategory {
    #[default]
    All,
    CruiseGuide,
    Mall,
    Test,
    Prospect,
}

impl RecipientCategory {
    pub fn includes(&self, kind: RecipientKind) -> bool {
        match self {
            Self::All => kind != RecipientKind::Direct,
            Self::CruiseGuide => kind == RecipientKind::CruiseGuide,
            Self::Mall => kind == RecipientKind::Mall,
            Self::Test => kind == RecipientKind::Test,
            Self::Prospect => kind == RecipientKind::Prospect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_recipient_with_type_tag() {
        let r = Recipient::Mall {
            contact: Contact {
                id: 3,
                name: Some("홍길동".to_string()),
                email: Some("hong@example.com".to_string()),
                phone: None,
            },
            mall_user_id: Some("hong".to_string()),
        };
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(json!("mall"), value["type"]);
        assert_eq!(json!("hong"), value["mallUserId"]);
        assert_eq!(json!(3), value["id"]);
        assert_eq!(RecipientKey::Listed(RecipientKind::Mall, 3), r.key());
        assert_eq!(Some("hong@example.com"), r.email());
    }

    #[test]
    fn method_selects_category() {
        assert_eq!(
            RecipientCategory::CruiseGuide,
            SendMethod::CruiseGuide.default_category()
        );
        assert_eq!(RecipientCategory::Mall, SendMethod::Email.default_category());
        assert_eq!(RecipientCategory::All, SendMethod::Kakao.default_category());
        assert!(!SendMethod::Email.requires_phone());
        assert_eq!(Some(SendMethod::Sms), SendMethod::parse("SMS"));
        assert!(RecipientCategory::All.includes(RecipientKind::Prospect));
        assert!(!RecipientCategory::All.includes(RecipientKind::Direct));
    }
}
