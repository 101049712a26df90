//! Mapping of LDAP search entries onto external user records.

use domain::models::{DirectoryServerConfig, ExternalUserRecord, LDAP_AUTH_MODULE};
use domain::services::derive_org_roles;
use ldap3::SearchEntry;

/// Pseudo attribute name that selects the entry DN.
const DN_ATTRIBUTE: &str = "dn";

/// First value of an attribute, matched case-insensitively. Empty when absent.
pub fn first_attr(entry: &SearchEntry, attr: &str) -> String {
    all_attr(entry, attr).into_iter().next().unwrap_or_default()
}

/// Every value of an attribute, matched case-insensitively.
pub fn all_attr(entry: &SearchEntry, attr: &str) -> Vec<String> {
    if attr.is_empty() {
        return Vec::new();
    }
    if attr.eq_ignore_ascii_case(DN_ATTRIBUTE) {
        return vec![entry.dn.clone()];
    }
    entry
        .attrs
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(attr))
        .map(|(_, values)| values.clone())
        .unwrap_or_default()
}

/// Attributes requested in the user search.
pub fn requested_attributes(server: &DirectoryServerConfig) -> Vec<String> {
    let attrs = &server.attributes;
    let mut requested = vec![
        attrs.username.clone(),
        attrs.surname.clone(),
        attrs.email.clone(),
        attrs.name.clone(),
        attrs.member_of.clone(),
    ];
    if !server.group_search_filter_user_attribute.is_empty() {
        requested.push(server.group_search_filter_user_attribute.clone());
    }

    let mut unique: Vec<String> = Vec::with_capacity(requested.len());
    for attr in requested {
        if attr.is_empty() || attr.eq_ignore_ascii_case(DN_ATTRIBUTE) {
            continue;
        }
        if !unique.iter().any(|u| u.eq_ignore_ascii_case(&attr)) {
            unique.push(attr);
        }
    }
    unique
}

/// Build the external record for one user entry.
///
/// `groups` are the directory groups the user belongs to, already resolved
/// from either the member-of attribute or a group search.
pub fn to_external_user(
    entry: &SearchEntry,
    groups: Vec<String>,
    server: &DirectoryServerConfig,
) -> ExternalUserRecord {
    let attrs = &server.attributes;
    let given = first_attr(entry, &attrs.name);
    let surname = first_attr(entry, &attrs.surname);
    let name = format!("{} {}", given, surname).trim().to_string();

    let derived = derive_org_roles(&groups, &server.group_mappings);

    ExternalUserRecord {
        auth_module: LDAP_AUTH_MODULE.to_string(),
        auth_id: entry.dn.clone(),
        login: first_attr(entry, &attrs.username),
        email: first_attr(entry, &attrs.email),
        name,
        is_admin: derived.is_admin,
        is_disabled: derived.is_disabled,
        org_roles: derived.org_roles,
        groups,
    }
}

/// Substitute the escaped value into a filter template's `%s` placeholders.
pub fn render_filter(template: &str, value: &str) -> String {
    template.replace("%s", &ldap3::ldap_escape(value))
}
