//! Plain-text rendering of the user directory.

use chrono::{DateTime, Utc};
use escopo_core::directory::CombinedUserView;

const HEADERS: [&str; 6] = ["UID", "EMAIL", "STATUS", "LICENSE", "CREATED", "LAST SIGN-IN"];

fn date(dt: Option<DateTime<Utc>>) -> String {
  dt.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
    .unwrap_or_else(|| "-".to_string())
}

fn license(user: &CombinedUserView) -> String {
  match user.trial_ends_at {
    Some(ends) => format!("{} (até {})", user.license_type, ends.format("%Y-%m-%d")),
    None => user.license_type.clone(),
  }
}

fn row(user: &CombinedUserView) -> [String; 6] {
  [
    user.uid.clone(),
    user.email.clone().unwrap_or_else(|| "-".to_string()),
    if user.disabled { "desativado" } else { "ativo" }.to_string(),
    license(user),
    date(Some(user.creation_time)),
    date(user.last_sign_in_time),
  ]
}

/// Render `users` as left-aligned columns, one line per account.
pub fn render(users: &[CombinedUserView]) -> String {
  let rows: Vec<[String; 6]> = users.iter().map(row).collect();

  let mut widths = HEADERS.map(|h| h.chars().count());
  for r in &rows {
    for (w, cell) in widths.iter_mut().zip(r) {
      *w = (*w).max(cell.chars().count());
    }
  }

  let line = |cells: &[String]| {
    cells
      .iter()
      .zip(widths)
      .map(|(c, w)| format!("{c:<w$}"))
      .collect::<Vec<_>>()
      .join("  ")
      .trim_end()
      .to_string()
  };

  let mut out = vec![line(&HEADERS.map(str::to_string))];
  out.extend(rows.iter().map(|r| line(r)));
  out.join("\n")
}
