use crate::client::{ClientError, RecipientSource};
use log_error::LogError;
use mall_types::recipient::{
    Contact, DirectAddress, MallUser, Recipient, RecipientCategory, RecipientKey, RecipientKind,
    SendMethod,
};
use std::collections::HashSet;
use std::future::Future;

fn method_reaches(method: SendMethod, kind: RecipientKind) -> bool {
    match method {
        SendMethod::CruiseGuide => kind == RecipientKind::CruiseGuide,
        SendMethod::Email => kind == RecipientKind::Mall,
        SendMethod::Sms | SendMethod::Kakao => kind != RecipientKind::Direct,
    }
}

async fn load<T, F>(wanted: bool, listing: F, what: &str) -> Vec<T>
where
    F: Future<Output = Result<Vec<T>, ClientError>>,
{
    if !wanted {
        return vec![];
    }
    listing
        .await
        .log_error(&format!("Unable to load {what}"))
        .unwrap_or_default()
}

struct Matcher<'a> {
    method: SendMethod,
    term: &'a str,
    lower: String,
}

impl<'a> Matcher<'a> {
    fn new(method: SendMethod, term: &'a str) -> Self {
        Self {
            method,
            term,
            lower: term.to_lowercase(),
        }
    }

    /// Contact has the address the method delivers to.
    fn reachable(&self, contact: &Contact) -> bool {
        let address = if self.method.requires_phone() {
            contact.phone.as_deref()
        } else {
            contact.email.as_deref().map(str::trim)
        };
        address.is_some_and(|a| !a.is_empty())
    }

    fn matches(&self, contact: &Contact) -> bool {
        if self.term.trim().is_empty() {
            return true;
        }
        let by_name = contact
            .name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&self.lower));
        let by_address = if self.method.requires_phone() {
            contact.phone.as_deref().is_some_and(|p| p.contains(self.term))
        } else {
            contact
                .email
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(&self.lower))
        };
        by_name || by_address
    }

    fn accepts(&self, contact: &Contact) -> bool {
        self.reachable(contact) && self.matches(contact)
    }
}

/// Recipients for the picker, in directory order: cruise guide, test, mall,
/// prospect. Listings are fetched concurrently; a failing listing is logged
/// and left out.
pub async fn search_recipients(
    source: &dyn RecipientSource,
    method: SendMethod,
    category: RecipientCategory,
    term: &str,
) -> Vec<Recipient> {
    let wants = |kind| method_reaches(method, kind) && category.includes(kind);
    let email_only = method == SendMethod::Email;

    let (guides, tests, mall, prospects) = futures::join!(
        load(
            wants(RecipientKind::CruiseGuide),
            source.cruise_guide_users(),
            "cruise guide users"
        ),
        load(wants(RecipientKind::Test), source.test_users(), "test users"),
        load(
            wants(RecipientKind::Mall),
            source.mall_users(email_only),
            "mall users"
        ),
        load(wants(RecipientKind::Prospect), source.prospects(), "prospects"),
    );

    let matcher = Matcher::new(method, term);
    let accepted = |contacts: Vec<Contact>| {
        contacts
            .into_iter()
            .filter(|c| matcher.accepts(c))
            .collect::<Vec<_>>()
    };
    let mut recipients = accepted(guides)
        .into_iter()
        .map(Recipient::CruiseGuide)
        .chain(accepted(tests).into_iter().map(Recipient::Test))
        .collect::<Vec<_>>();
    recipients.extend(
        mall.into_iter()
            .filter(|u| matcher.accepts(&u.contact))
            .map(|MallUser { mut contact, mall_user_id }| {
                if email_only {
                    contact.phone = None;
                }
                Recipient::Mall {
                    contact,
                    mall_user_id,
                }
            }),
    );
    recipients.extend(accepted(prospects).into_iter().map(Recipient::Prospect));
    log::debug!(
        "{} recipients for {method} / {category:?} matching {term:?}",
        recipients.len()
    );
    recipients
}

/// Comma separated addresses typed by the operator. Blank entries and
/// entries without `@` are dropped.
pub fn parse_direct_emails(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty() && e.contains('@'))
        .map(str::to_string)
        .collect()
}

/// Recipients picked for a message, in pick order.
#[derive(Debug, Clone, Default)]
pub struct RecipientSelection {
    selected: Vec<Recipient>,
}

impl RecipientSelection {
    pub fn selected(&self) -> &[Recipient] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, recipient: &Recipient) -> bool {
        let key = recipient.key();
        self.selected.iter().any(|r| r.key() == key)
    }

    /// Returns whether the recipient is selected afterwards.
    pub fn toggle(&mut self, recipient: Recipient) -> bool {
        let key = recipient.key();
        let before = self.selected.len();
        self.selected.retain(|r| r.key() != key);
        if self.selected.len() == before {
            self.selected.push(recipient);
            true
        } else {
            false
        }
    }

    /// `false` for an empty batch.
    pub fn all_selected(&self, batch: &[Recipient]) -> bool {
        !batch.is_empty() && batch.iter().all(|r| self.is_selected(r))
    }

    pub fn select_all(&mut self, batch: &[Recipient]) {
        let mut keys = self.selected.iter().map(Recipient::key).collect::<HashSet<_>>();
        for recipient in batch {
            if keys.insert(recipient.key()) {
                self.selected.push(recipient.clone());
            }
        }
    }

    /// Unselects every listed recipient of the kinds present in `batch`.
    /// Direct entries stay.
    pub fn clear(&mut self, batch: &[Recipient]) {
        let kinds = batch.iter().map(Recipient::kind).collect::<HashSet<_>>();
        self.selected
            .retain(|r| r.kind() == RecipientKind::Direct || !kinds.contains(&r.kind()));
    }

    /// Select-all checkbox: clears the batch when it is fully selected,
    /// selects it otherwise.
    pub fn toggle_all(&mut self, batch: &[Recipient]) {
        if self.all_selected(batch) {
            self.clear(batch);
        } else {
            self.select_all(batch);
        }
    }

    /// Adds typed addresses, skipping ones already selected.
    pub fn add_direct<I: IntoIterator<Item = DirectAddress>>(&mut self, addresses: I) {
        let batch = addresses
            .into_iter()
            .map(|address| Recipient::Direct { address })
            .collect::<Vec<_>>();
        self.select_all(&batch);
    }

    pub fn remove(&mut self, key: &RecipientKey) {
        self.selected.retain(|r| &r.key() != key);
    }
}
