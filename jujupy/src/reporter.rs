//! Incremental progress output for polling loops.
//!
//! Each distinct group is printed once on its own line. While the group stays
//! the same, every further poll only appends a dot, wrapping at a fixed
//! column so the stream stays readable in a terminal or a CI log.

use std::collections::BTreeMap;
use std::io::{self, Write};

/// State value to the ids of the entities currently in that state.
pub type Group = BTreeMap<String, Vec<String>>;

pub const DEFAULT_WRAP_WIDTH: usize = 79;

pub struct GroupReporter<W: Write> {
    stream: W,
    expected: String,
    last_group: Option<Group>,
    ticks: usize,
    wrap_offset: usize,
    wrap_width: usize,
}

impl<W: Write> GroupReporter<W> {
    /// `expected` is the state value left out of the output.
    pub fn new(stream: W, expected: impl Into<String>) -> Self {
        Self::with_wrap_width(stream, expected, DEFAULT_WRAP_WIDTH)
    }

    pub fn with_wrap_width(stream: W, expected: impl Into<String>, wrap_width: usize) -> Self {
        Self {
            stream,
            expected: expected.into(),
            last_group: None,
            ticks: 0,
            wrap_offset: 0,
            wrap_width: wrap_width.max(1),
        }
    }

    fn write(&mut self, s: &str) -> io::Result<()> {
        self.stream.write_all(s.as_bytes())?;
        self.stream.flush()
    }

    /// Terminate the current line, if anything was printed.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.last_group.is_some() {
            self.write("\n")?;
        }
        Ok(())
    }

    pub fn update(&mut self, group: Group) -> io::Result<()> {
        if self.last_group.as_ref() == Some(&group) {
            if (self.wrap_offset + self.ticks) % self.wrap_width == 0 {
                self.write("\n")?;
            }
            let tick = if self.ticks > 0 || self.wrap_offset == 0 {
                "."
            } else {
                " ."
            };
            self.write(tick)?;
            self.ticks += 1;
            return Ok(());
        }

        let line = group
            .iter()
            .filter(|(value, _)| **value != self.expected)
            .map(|(value, ids)| format!("{value}: {}", ids.join(", ")))
            .collect::<Vec<_>>()
            .join(" | ");
        let lead_length = line.chars().count() + 1;

        if self.last_group.is_some() {
            self.write(&format!("\n{line}"))?;
        } else {
            self.write(&line)?;
        }

        tracing::debug!(%line, "status changed");
        self.last_group = Some(group);
        self.ticks = 0;
        self.wrap_offset = if lead_length < self.wrap_width {
            lead_length
        } else {
            0
        };
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.stream
    }

    pub fn into_inner(self) -> W {
        self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(entries: &[(&str, &[&str])]) -> Group {
        entries
            .iter()
            .map(|(value, ids)| {
                (
                    value.to_string(),
                    ids.iter().map(|id| id.to_string()).collect(),
                )
            })
            .collect()
    }

    fn output(reporter: &GroupReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.get_ref().clone()).expect("reporter writes utf-8")
    }

    #[test]
    fn repeats_become_ticks() {
        let mut reporter = GroupReporter::new(Vec::new(), "active");
        for _ in 0..3 {
            reporter.update(group(&[("x", &["a"])])).unwrap();
        }

        assert_eq!(output(&reporter), "x: a ..");
        assert_eq!(reporter.ticks, 2);
    }

    #[test]
    fn change_starts_a_new_line() {
        let mut reporter = GroupReporter::new(Vec::new(), "active");
        for _ in 0..4 {
            reporter.update(group(&[("pending", &["app/0"])])).unwrap();
        }
        reporter.update(group(&[("blocked", &["app/0"])])).unwrap();

        assert_eq!(reporter.ticks, 0);
        assert_eq!(output(&reporter), "pending: app/0 ...\nblocked: app/0");

        reporter.update(group(&[("blocked", &["app/0"])])).unwrap();
        assert_eq!(output(&reporter), "pending: app/0 ...\nblocked: app/0 .");
    }

    #[test]
    fn segments_sorted_and_expected_omitted() {
        let mut reporter = GroupReporter::new(Vec::new(), "active");
        reporter
            .update(group(&[
                ("waiting", &["app/2", "app/3"]),
                ("active", &["app/0"]),
                ("blocked", &["app/1"]),
            ]))
            .unwrap();

        assert_eq!(output(&reporter), "blocked: app/1 | waiting: app/2, app/3");
    }

    #[test]
    fn ticks_wrap_at_width() {
        let mut reporter = GroupReporter::with_wrap_width(Vec::new(), "active", 10);
        for _ in 0..7 {
            reporter.update(group(&[("x", &["a"])])).unwrap();
        }

        assert_eq!(output(&reporter), "x: a .....\n.");
    }

    #[test]
    fn long_segment_ticks_on_next_line() {
        let mut reporter = GroupReporter::with_wrap_width(Vec::new(), "active", 10);
        for _ in 0..3 {
            reporter.update(group(&[("blocked", &["app/0"])])).unwrap();
        }

        assert_eq!(output(&reporter), "blocked: app/0\n..");
    }

    #[test]
    fn finish_without_updates_writes_nothing() {
        let mut reporter = GroupReporter::new(Vec::new(), "active");
        reporter.finish().unwrap();

        assert_eq!(output(&reporter), "");
    }

    #[test]
    fn finish_ends_the_line_once() {
        let mut reporter = GroupReporter::new(Vec::new(), "active");
        reporter.update(group(&[("x", &["a"])])).unwrap();
        reporter.update(group(&[("x", &["a"])])).unwrap();
        reporter.update(group(&[("y", &["a"])])).unwrap();
        reporter.finish().unwrap();

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(out, "x: a .\ny: a\n");
    }

    /// Records flushes and how many bytes were written since the last one.
    #[derive(Default)]
    struct FlushCounter {
        written: Vec<u8>,
        unflushed: usize,
        flushes: usize,
    }

    impl Write for FlushCounter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            self.unflushed += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.unflushed = 0;
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn every_write_is_flushed() {
        let mut reporter =
            GroupReporter::with_wrap_width(FlushCounter::default(), "active", 10);
        let mut expected_flushes = 0;

        // segment, five ticks, a wrapping tick (newline then dot), a new segment
        let updates = [
            ("x", 1),
            ("x", 1),
            ("x", 1),
            ("x", 1),
            ("x", 1),
            ("x", 1),
            ("x", 2),
            ("y", 1),
        ];
        for (update, writes) in updates {
            reporter.update(group(&[(update, &["a"])])).unwrap();
            expected_flushes += writes;
            assert_eq!(reporter.get_ref().unflushed, 0);
            assert_eq!(reporter.get_ref().flushes, expected_flushes);
        }

        reporter.finish().unwrap();
        assert_eq!(reporter.get_ref().unflushed, 0);
        assert_eq!(reporter.get_ref().flushes, expected_flushes + 1);

        let out = String::from_utf8(reporter.into_inner().written).unwrap();
        assert_eq!(out, "x: a .....\n.\ny: a\n");
    }

    #[test]
    fn empty_group_is_still_a_rendered_group() {
        let mut reporter = GroupReporter::new(Vec::new(), "active");
        reporter.update(Group::new()).unwrap();
        reporter.update(Group::new()).unwrap();
        reporter.finish().unwrap();

        assert_eq!(output(&reporter), " .\n");
    }
}
