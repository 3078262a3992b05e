// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pretty printers for reporting information.

use std::{
    borrow::Cow,
    sync::{Mutex, PoisonError},
};

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

type Block = Vec<Cow<'static, str>>;

lazy_static::lazy_static! {
    static ref WARNINGS: Mutex<Vec<Block>> = Mutex::new(vec![]);
}

/// Prefix every line of every block with a tree-drawing symbol. The first
/// line of a block gets a branch, unless it's the only line of the last
/// block, which closes the tree.
pub(super) fn render_blocks(blocks: &[Block]) -> Vec<String> {
    let num_blocks = blocks.len();
    let mut out = vec![];
    for (i_block, block) in blocks.iter().enumerate() {
        let num_lines = block.len();
        let last_block = i_block + 1 == num_blocks;
        for (i_line, line) in block.iter().enumerate() {
            let symbol = match (i_line, i_line + 1 == num_lines, last_block) {
                (0, true, true) => UP_AND_RIGHT,
                (0, _, _) => VERTICAL_AND_RIGHT,
                _ => VERTICAL,
            };
            out.push(format!("{symbol} {line}"));
        }
    }
    out
}

/// Collects lines under a bold title and logs them all at once.
pub(crate) struct InfoPrinter {
    title: Cow<'static, str>,
    blocks: Vec<Block>,
}

impl InfoPrinter {
    pub(crate) fn new(title: Cow<'static, str>) -> Self {
        Self {
            title,
            blocks: vec![],
        }
    }

    pub(crate) fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push(vec![line]);
    }

    pub(crate) fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub(crate) fn display(self) {
        log::info!("{}", console::style(self.title).bold());
        for line in render_blocks(&self.blocks) {
            log::info!("{line}");
        }
        log::info!("");
    }
}

/// Something that can be deferred as a warning until [`display_warnings`] is
/// called.
pub(crate) trait Warn {
    fn warn(self);
}

fn push_warning(block: Block) {
    WARNINGS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(block);
}

impl Warn for &'static str {
    fn warn(self) {
        push_warning(vec![self.into()]);
    }
}

impl Warn for String {
    fn warn(self) {
        push_warning(vec![self.into()]);
    }
}

impl Warn for Cow<'static, str> {
    fn warn(self) {
        push_warning(vec![self]);
    }
}

impl Warn for Vec<Cow<'static, str>> {
    fn warn(self) {
        push_warning(self);
    }
}

/// Print out any warnings that have been collected as CLI arguments have been
/// parsed. This should only be called once, after all arguments have been
/// parsed into parameters.
pub(crate) fn display_warnings() {
    let mut warnings = WARNINGS.lock().unwrap_or_else(PoisonError::into_inner);
    log::debug!("Displaying warnings");
    if warnings.is_empty() {
        return;
    }

    log::warn!("{}", console::style("Warnings").bold());
    for line in render_blocks(&warnings) {
        log::warn!("{line}");
    }
    log::warn!("");
    warnings.clear();
}
