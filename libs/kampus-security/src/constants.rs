//! Well-known identities used by development plugins and tests.

use uuid::Uuid;

/// Subject returned by the static session plugin when no explicit identity is configured.
pub const DEFAULT_SUBJECT_ID: Uuid = Uuid::from_u128(0x1111_1111_6a88_4768_9dfc_6bcd_5187_d9ed);

/// Site the default development subject administers.
pub const DEFAULT_SITE_ID: Uuid = Uuid::from_u128(0x0000_0000_df51_5b42_9538_d2b5_6b7e_e953);
