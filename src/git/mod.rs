// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Local VCS gateway.
//!
//! ```text
//!          orchestrator
//!               |
//!               v
//!      ,------------------,
//!      | LocalVcs (trait) |
//!      '--------+---------'
//!               |
//!               v
//!            GitCli
//!     gix:  is_work_tree, current_branch   (read, no subprocess)
//!     git:  init/add/commit/status/push/pull/remote/config
//!               |
//!               v
//!   status.rs   porcelain v1 parsing --> VcsState, StatusEntry
//!   remote.rs   remote url --> canonical https web url
//! ```

pub mod backend;
pub mod remote;
pub mod status;
