//! Hand a branch over to Laravel Shift and collect the result.
//!
//! Laravel Shift only works on repositories hosted on GitHub. `shifter`
//! pushes the current branch to a private scratch repository on the user's
//! GitHub account, prints the pull request Shift leaves there once it is done,
//! and deletes the scratch repository afterwards.

#![warn(missing_docs)]
#![warn(
    clippy::all,
    clippy::as_conversions,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro
)]
#![allow(clippy::too_many_arguments, clippy::blocks_in_conditions)]

pub mod commands;
