// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{resolve_owner, set_current_user};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            println!("Current user: {}", resolve_owner(conn, sub)?);
        }
        Some(("set-user", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            if name.is_empty() {
                return Err(anyhow!("User name must not be empty"));
            }
            set_current_user(conn, name)?;
            println!("Current user set to {}", name);
        }
        _ => {}
    }
    Ok(())
}
