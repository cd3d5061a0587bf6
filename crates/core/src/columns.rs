//! Well-known column names from the claim upload schema.
//!
//! Rules refer to columns by these constants so a renamed upload field only
//! has to be fixed in one place. Columns not listed here are carried through
//! the pipeline untouched.

/// Engine-owned output column holding the list of matched trigger labels.
pub const ANNOTATION_COLUMN: &str = "Filter Applied";

pub const ACTIVITY_CODE: &str = "ACTIVITY_CODE";
pub const ACTIVITY_DESCRIPTION: &str = "ACTIVITY_DESCRIPTION";
pub const ACTIVITY_INTERNAL_DESCRIPTION: &str = "ACTIVITY_INTERNAL_DESCRIPTION";
pub const ACTIVITY_QUANTITY_APPROVED: &str = "ACTIVITY_QUANTITY_APPROVED";
pub const BENEFIT_TYPE: &str = "BENEFIT_TYPE";
pub const CLAIM_NUMBER: &str = "CLAIM_NUMBER";
pub const GENDER: &str = "GENDER";
pub const MEMBER_AGE: &str = "MEMBER_AGE";
pub const POLICY_NUMBER: &str = "POLICY_NUMBER";
pub const PRE_AUTH_NUMBER: &str = "PRE_AUTH_NUMBER";
pub const PRESENTING_COMPLAINTS: &str = "PRESENTING_COMPLAINTS";
pub const PRIMARY_ICD_CODE: &str = "PRIMARY_ICD_CODE";
pub const PROVIDER_NAME: &str = "PROVIDER_NAME";
