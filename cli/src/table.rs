// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use colored::{Color, Colorize};
use unicode_width::UnicodeWidthStr;

/// Rows of `T` printed as aligned columns under a bold header.
pub struct Table<'a, T, C: Column<T>> {
    pub columns: Vec<C>,
    pub separator: String,
    pub padding: bool,
    pub data: &'a [T],
}

impl<T, C: Column<T>> Table<'_, T, C> {
    pub fn write_to(&self, w: &mut impl io::Write) -> Result<(), Box<dyn Error>> {
        let header: Vec<String> = self.columns.iter().map(|c| c.header().to_string()).collect();
        let rows: Vec<Vec<String>> = self
            .data
            .iter()
            .map(|row| self.columns.iter().map(|col| col.format(row)).collect())
            .collect();

        let widths = self
            .padding
            .then(|| column_widths(std::iter::once(&header).chain(&rows)));

        let header = header
            .into_iter()
            .enumerate()
            .map(|(i, cell)| self.pad(i, cell, widths.as_deref()).bold().to_string());
        writeln!(w, "{}", header.collect::<Vec<_>>().join(&self.separator))?;

        for (cells, row) in rows.into_iter().zip(self.data) {
            let line = cells
                .into_iter()
                .enumerate()
                .map(|(i, cell)| {
                    let cell = self.pad(i, cell, widths.as_deref());
                    match self.columns[i].get_color(row) {
                        Some(color) => cell.color(color).to_string(),
                        None => cell,
                    }
                })
                .collect::<Vec<_>>()
                .join(&self.separator);
            writeln!(w, "{line}")?;
        }

        Ok(())
    }

    fn pad(&self, i: usize, cell: String, widths: Option<&[usize]>) -> String {
        let Some(widths) = widths else {
            return cell;
        };

        let direction = self.columns[i].padding_direction();
        // Last column does not need padding if it's left-aligned
        if i == self.columns.len() - 1 && direction == PaddingDirection::Left {
            return cell;
        }

        let fill = " ".repeat(widths[i].saturating_sub(cell.width()));
        match direction {
            PaddingDirection::Left => cell + &fill,
            PaddingDirection::Right => fill + &cell,
        }
    }
}

pub trait Column<T> {
    fn header(&self) -> &'static str;
    fn format(&self, data: &T) -> String;

    fn padding_direction(&self) -> PaddingDirection {
        PaddingDirection::Left
    }

    fn get_color(&self, _data: &T) -> Option<Color> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingDirection {
    Left,
    Right,
}

fn column_widths<'a>(rows: impl Iterator<Item = &'a Vec<String>>) -> Vec<usize> {
    let mut max_width = Vec::new();
    for row in rows {
        max_width.resize(max_width.len().max(row.len()), 0);
        for (i, cell) in row.iter().enumerate() {
            max_width[i] = max_width[i].max(cell.width());
        }
    }
    max_width
}
