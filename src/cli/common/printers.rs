// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tree-style reports of parameters and warnings, e.g.
//!
//! ```text
//! Observer
//! ├ 53.8000° N, 20.5099° E, 0.0m
//! └ 8962 stars brighter than magnitude 10
//! ```

use std::{borrow::Cow, sync::Mutex};

use log::Level;

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

type Block = Vec<Cow<'static, str>>;

lazy_static::lazy_static! {
    static ref WARNINGS: Mutex<Vec<Block>> = Mutex::new(vec![]);
}

/// Prefix each line of each block with a tree symbol. Only the first line of
/// a block gets a branch; the last block's branch closes the tree.
fn tree_lines(blocks: &[Block]) -> Vec<String> {
    let num_blocks = blocks.len();
    let mut lines = vec![];
    for (i_block, block) in blocks.iter().enumerate() {
        let last_block = i_block + 1 == num_blocks;
        for (i_line, line) in block.iter().enumerate() {
            let symbol = match (i_line, block.len() == 1, last_block) {
                (0, true, true) => UP_AND_RIGHT,
                (0, _, _) => VERTICAL_AND_RIGHT,
                _ => VERTICAL,
            };
            lines.push(format!("{symbol} {line}"));
        }
    }
    lines
}

fn log_tree(level: Level, title: &str, blocks: &[Block]) {
    log::log!(level, "{}", console::style(title).bold());
    for line in tree_lines(blocks) {
        log::log!(level, "{line}");
    }
    log::log!(level, "");
}

/// Collects lines of information under a title, then logs them as a tree.
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

    /// Lines in a block are kept together under one branch.
    pub(crate) fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub(crate) fn display(self) {
        log_tree(Level::Info, &self.title, &self.blocks);
    }
}

/// Something that can be held back and reported with all the other warnings
/// by [`display_warnings`].
pub(crate) trait Warn {
    fn warn(self);
}

fn push_warning(block: Block) {
    // A poisoned lock only means another thread panicked while warning.
    let mut warnings = match WARNINGS.lock() {
        Ok(w) => w,
        Err(poisoned) => poisoned.into_inner(),
    };
    warnings.push(block);
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

impl<const N: usize> Warn for [Cow<'static, str>; N] {
    fn warn(self) {
        push_warning(self.into());
    }
}

/// Log all of the warnings that have been collected, then forget them. This
/// should be called once all arguments have been parsed.
pub(crate) fn display_warnings() {
    let blocks = match WARNINGS.lock() {
        Ok(mut w) => std::mem::take(&mut *w),
        Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
    };
    log::debug!("Displaying {} warnings", blocks.len());
    if !blocks.is_empty() {
        log_tree(Level::Warn, "Warnings", &blocks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_lines() {
        let blocks: Vec<Block> = vec![
            vec!["one".into()],
            vec!["two".into(), "two and a bit".into()],
            vec!["three".into()],
        ];
        assert_eq!(
            tree_lines(&blocks),
            ["├ one", "├ two", "│ two and a bit", "└ three"]
        );

        // A multi-line block at the end doesn't close the tree.
        let blocks: Vec<Block> = vec![vec!["a".into(), "b".into()]];
        assert_eq!(tree_lines(&blocks), ["├ a", "│ b"]);

        assert!(tree_lines(&[]).is_empty());
    }
}
