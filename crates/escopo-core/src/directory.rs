//! The combined user view and the identity ⨝ profile join that produces it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  identity::IdentityRecord,
  profile::{DEFAULT_LICENSE_TYPE, ProfileDocument},
};

/// Maximum number of accounts fetched for one listing. Directories larger
/// than this are truncated.
pub const LIST_PAGE_SIZE: usize = 1000;

/// One row of the admin user directory — never stored, always derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedUserView {
  pub uid:               String,
  pub email:             Option<String>,
  pub disabled:          bool,
  pub creation_time:     DateTime<Utc>,
  pub last_sign_in_time: Option<DateTime<Utc>>,
  /// Never empty; see [`DEFAULT_LICENSE_TYPE`].
  pub license_type:      String,
  pub trial_ends_at:     Option<DateTime<Utc>>,
}

/// Left-join `identities` against `profiles` on uid and order the result
/// newest account first.
///
/// Profiles without a matching identity are dropped. Accounts created at the
/// same instant keep the order the provider returned them in.
pub fn combine_users(
  identities: Vec<IdentityRecord>,
  profiles: Vec<ProfileDocument>,
) -> Vec<CombinedUserView> {
  let profiles: HashMap<String, ProfileDocument> =
    profiles.into_iter().map(|p| (p.id.clone(), p)).collect();

  let mut users: Vec<CombinedUserView> = identities
    .into_iter()
    .map(|identity| {
      let profile = profiles.get(&identity.uid);
      CombinedUserView {
        license_type:      profile
          .map(ProfileDocument::license_type)
          .unwrap_or(DEFAULT_LICENSE_TYPE)
          .to_owned(),
        trial_ends_at:     profile.and_then(|p| p.trial_ends_at),
        uid:               identity.uid,
        email:             identity.email,
        disabled:          identity.disabled,
        creation_time:     identity.creation_time,
        last_sign_in_time: identity.last_sign_in_time,
      }
    })
    .collect();

  users.sort_by(|a, b| b.creation_time.cmp(&a.creation_time));
  users
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn identity(uid: &str, day: u32) -> IdentityRecord {
    IdentityRecord {
      uid:               uid.to_owned(),
      email:             Some(format!("{uid}@example.com")),
      disabled:          false,
      creation_time:     Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
      last_sign_in_time: None,
    }
  }

  fn profile(id: &str, license: Option<&str>) -> ProfileDocument {
    ProfileDocument {
      id:            id.to_owned(),
      license_type:  license.map(str::to_owned),
      trial_ends_at: None,
    }
  }

  #[test]
  fn newest_first_with_default_license() {
    let users = combine_users(
      vec![identity("a", 1), identity("b", 2)],
      vec![profile("a", Some("pro"))],
    );

    let order: Vec<_> = users.iter().map(|u| u.uid.as_str()).collect();
    assert_eq!(order, ["b", "a"]);
    assert_eq!(users[0].license_type, "trial");
    assert_eq!(users[1].license_type, "pro");
  }

  #[test]
  fn orphan_profiles_are_dropped() {
    let users = combine_users(
      vec![identity("a", 1)],
      vec![profile("a", None), profile("ghost", Some("pro"))],
    );
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].uid, "a");
  }

  #[test]
  fn empty_license_falls_back_to_trial() {
    let users = combine_users(vec![identity("a", 1)], vec![profile("a", Some(""))]);
    assert_eq!(users[0].license_type, DEFAULT_LICENSE_TYPE);
  }

  #[test]
  fn trial_expiry_is_carried_over() {
    let ends = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let mut doc = profile("a", None);
    doc.trial_ends_at = Some(ends);

    let users = combine_users(vec![identity("a", 1), identity("b", 3)], vec![doc]);
    assert_eq!(users[1].trial_ends_at, Some(ends));
    assert_eq!(users[0].trial_ends_at, None);
  }

  #[test]
  fn equal_creation_times_keep_provider_order() {
    let users = combine_users(
      vec![identity("x", 5), identity("y", 5), identity("z", 5)],
      vec![],
    );
    let order: Vec<_> = users.iter().map(|u| u.uid.as_str()).collect();
    assert_eq!(order, ["x", "y", "z"]);
  }

  #[test]
  fn serialises_with_camel_case_keys() {
    let users = combine_users(vec![identity("a", 1)], vec![]);
    let json = serde_json::to_value(&users[0]).unwrap();
    assert!(json.get("creationTime").is_some());
    assert!(json.get("lastSignInTime").is_some());
    assert_eq!(json["licenseType"], "trial");
  }
}
