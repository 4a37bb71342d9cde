// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Timestamp encoding for TEXT columns.
//!
//! Fixed-width RFC 3339 (microseconds, `Z` suffix) so that `ORDER BY` on the
//! raw column sorts chronologically.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::error::DbError;

/// Current time at the precision the database keeps.
pub(crate) fn now() -> DateTime<Utc> {
	Utc::now().trunc_subsecs(6)
}

pub(crate) fn format(ts: DateTime<Utc>) -> String {
	ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse(value: &str, field: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {field}: {e}")))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn lexical_order_matches_time_order(a in 0i64..4_000_000_000_000_000, b in 0i64..4_000_000_000_000_000) {
			let ta = DateTime::from_timestamp_micros(a).unwrap();
			let tb = DateTime::from_timestamp_micros(b).unwrap();
			prop_assert_eq!(format(ta).cmp(&format(tb)), ta.cmp(&tb));
		}
	}

	#[test]
	fn roundtrip_preserves_micros() {
		let ts = DateTime::from_timestamp_micros(1_700_000_000_123_456).unwrap();
		assert_eq!(parse(&format(ts), "created_at").unwrap(), ts);
	}

	#[test]
	fn parse_rejects_garbage() {
		assert!(matches!(
			parse("yesterday", "created_at"),
			Err(DbError::Internal(_))
		));
	}
}
