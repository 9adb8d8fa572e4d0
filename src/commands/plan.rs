//! `keywarden plan` - preview convergence without side effects.

use anyhow::Result;
use std::path::Path;

use crate::ui;

pub fn run(config: Option<&Path>) -> Result<()> {
    let resource = super::resource(config)?;
    let (actual, ops) = resource.plan()?;

    ui::display_state(&actual);
    ui::display_plan(&ops);

    Ok(())
}
