// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only state threaded through every resolver call.

use std::sync::Arc;

use crate::config::Config;
use crate::style::StyleTable;
use crate::variables::VariableTable;
use crate::version::GrammarVersion;

/// Document-level inputs shared by room and connection resolution.
///
/// Cheap to clone; floors processed in parallel each hold a clone.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub version: GrammarVersion,
    pub config: Arc<Config>,
    pub styles: Arc<StyleTable>,
    pub variables: Arc<VariableTable>,
}

impl ResolutionContext {
    pub fn new(
        version: GrammarVersion,
        config: Config,
        styles: StyleTable,
        variables: VariableTable,
    ) -> Self {
        Self {
            version,
            config: Arc::new(config),
            styles: Arc::new(styles),
            variables: Arc::new(variables),
        }
    }
}
