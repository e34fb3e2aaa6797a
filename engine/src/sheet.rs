//! FILENAME: engine/src/sheet.rs
//! PURPOSE: The grid container: sparse storage keyed by Position, position
//! validation, cell materialization, cycle detection, and transitive cache
//! invalidation.
//! CONTEXT: This is where the four-phase edit protocol (classify -> cycle
//! check -> commit -> re-link and invalidate) actually runs, because it is
//! the only component that can see every cell at once. `Cell` itself stays
//! dumb storage plus accessors.

use crate::cell::Cell;
use crate::content::CellContent;
use crate::error::{CellSetError, CircularDependencyError, InvalidPositionError};
use crate::position::Position;
use crate::value::CellValue;
use std::collections::{BTreeSet, HashMap};
use std::io::{self, Write};

/// The grid: cells are materialized lazily, keyed by Position.
#[derive(Debug, Default)]
pub struct Sheet {
    cells: HashMap<Position, Cell>,
}

impl Sheet {
    pub fn new() -> Self {
        Sheet { cells: HashMap::new() }
    }

    fn validate(pos: Position) -> Result<(), InvalidPositionError> {
        if pos.is_valid() {
            Ok(())
        } else {
            Err(InvalidPositionError { row: pos.row, col: pos.col })
        }
    }

    /// Parses and commits `text` at `pos`. On any error the grid is
    /// unchanged except that `pos` may have been materialized as Empty (it
    /// has no observable content effect).
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<(), CellSetError> {
        Self::validate(pos)?;
        self.cells.entry(pos).or_insert_with(|| Cell::new(CellContent::Empty));

        let candidate = CellContent::classify(text)?;
        let candidate_refs = candidate.references();

        if self.would_create_cycle(pos, &candidate_refs) {
            return Err(CellSetError::CircularDependency(CircularDependencyError));
        }

        let old_outgoing = self.cells[&pos].outgoing().clone();

        {
            let cell = self.cells.get_mut(&pos).expect("materialized above");
            cell.set_content(candidate);
            cell.set_outgoing(candidate_refs.clone());
        }

        for target in old_outgoing.difference(&candidate_refs) {
            self.detach_incoming(pos, *target);
        }
        for target in candidate_refs.difference(&old_outgoing) {
            self.cells.entry(*target).or_insert_with(|| Cell::new(CellContent::Empty));
            self.cells.get_mut(target).expect("materialized above").add_incoming(pos);
        }

        self.invalidate(pos);
        log::debug!("set_cell({}) committed, {} reference(s)", pos, candidate_refs.len());

        Ok(())
    }

    /// Removes `this` from `target`'s incoming set, dropping `target`'s
    /// storage slot if it is now Empty and unreferenced.
    fn detach_incoming(&mut self, from: Position, target: Position) {
        if let Some(cell) = self.cells.get_mut(&target) {
            cell.remove_incoming(from);
            if cell.is_empty() && !cell.is_referenced() {
                self.cells.remove(&target);
            }
        }
    }

    pub fn get_cell(&self, pos: Position) -> Result<Option<&Cell>, InvalidPositionError> {
        Self::validate(pos)?;
        Ok(self.cells.get(&pos))
    }

    /// Like `get_cell` but skips position validation. Used internally by
    /// the evaluator, which has already validated the position itself
    /// (and needs to distinguish "invalid" from "absent").
    pub(crate) fn get_cell_unchecked(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    pub fn clear_cell(&mut self, pos: Position) -> Result<(), InvalidPositionError> {
        Self::validate(pos)?;

        let Some(cell) = self.cells.get(&pos) else {
            return Ok(());
        };
        if cell.is_empty() {
            return Ok(());
        }

        let old_outgoing = cell.outgoing().clone();
        self.cells.get_mut(&pos).unwrap().set_content(CellContent::Empty);
        self.cells.get_mut(&pos).unwrap().set_outgoing(BTreeSet::new());

        for target in &old_outgoing {
            self.detach_incoming(pos, *target);
        }

        self.invalidate(pos);

        if let Some(cell) = self.cells.get(&pos) {
            if !cell.is_referenced() {
                self.cells.remove(&pos);
            }
        }

        Ok(())
    }

    /// Would installing `candidate_refs` as `pos`'s outgoing set create a
    /// cycle? Per the reference algorithm: walk forward from `pos` along
    /// existing *incoming* edges; if any visited cell lies in
    /// `candidate_refs`, the edit would close a cycle.
    fn would_create_cycle(&self, pos: Position, candidate_refs: &BTreeSet<Position>) -> bool {
        if candidate_refs.contains(&pos) {
            return true;
        }
        if candidate_refs.is_empty() {
            return false;
        }

        let mut visited: BTreeSet<Position> = BTreeSet::new();
        let mut stack: Vec<Position> = self
            .cells
            .get(&pos)
            .map(|c| c.incoming().iter().copied().collect())
            .unwrap_or_default();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if candidate_refs.contains(&current) {
                log::trace!("cycle detected: {} reaches {} via incoming edges", pos, current);
                return true;
            }
            if let Some(cell) = self.cells.get(&current) {
                stack.extend(cell.incoming().iter().copied());
            }
        }

        false
    }

    /// Transitively clears memoized formula results downstream of `start`,
    /// walking along incoming edges and pruning at any cell whose cache is
    /// already invalid (or has none).
    fn invalidate(&mut self, start: Position) {
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            let incoming: Vec<Position> = match self.cells.get(&current) {
                Some(cell) => cell.incoming().iter().copied().collect(),
                None => continue,
            };
            for dep in incoming {
                if let Some(cell) = self.cells.get(&dep) {
                    if cell.clear_cache() {
                        log::trace!("invalidated cache at {}", dep);
                        stack.push(dep);
                    }
                }
            }
        }
    }

    /// Smallest rows x cols rectangle, anchored at (0,0), covering every
    /// cell whose text is non-empty.
    pub fn printable_size(&self) -> (u32, u32) {
        let mut rows = 0u32;
        let mut cols = 0u32;
        for (pos, cell) in &self.cells {
            if !cell.text().is_empty() {
                rows = rows.max(pos.row + 1);
                cols = cols.max(pos.col + 1);
            }
        }
        (rows, cols)
    }

    pub fn print_values(&self, out: &mut impl Write) -> io::Result<()> {
        self.print_grid(out, |cell| cell.value(self).to_string())
    }

    pub fn print_texts(&self, out: &mut impl Write) -> io::Result<()> {
        self.print_grid(out, |cell| cell.text())
    }

    fn print_grid(&self, out: &mut impl Write, render: impl Fn(&Cell) -> String) -> io::Result<()> {
        let (rows, cols) = self.printable_size();
        for row in 0..rows {
            for col in 0..cols {
                if col > 0 {
                    write!(out, "\t")?;
                }
                if let Some(cell) = self.cells.get(&Position::new(row, col)) {
                    if !cell.is_empty() {
                        write!(out, "{}", render(cell))?;
                    }
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
