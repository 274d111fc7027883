//! Bounded, binary-safe rendering of commands for span attributes.
//!
//! Telemetry backends want compact single-line values with predictable
//! cardinality, so everything here is capped: 64 bytes per text/binary
//! argument, 33 arguments per command, 101 commands per pipeline dump and
//! 10 distinct names in a pipeline summary. Arguments whose bytes fall
//! outside a small "simple" character class are hex-encoded in full, which
//! keeps control characters and multi-byte sequences out of attribute
//! values. Rendering never fails; every argument kind has a fallback form.

use std::fmt::Write as _;

use chrono::SecondsFormat;

use crate::command::{Arg, Cmder};

const ARG_LEN_LIMIT: usize = 64;
const NUM_ARG_LIMIT: usize = 32;
const NUM_CMD_LIMIT: usize = 100;
const NUM_NAME_LIMIT: usize = 10;

/// Renders a single command.
///
/// Arguments are space-separated and capped at 33; past the cap the list is
/// truncated silently, with no ellipsis marker. If the command finished with
/// a terminal error, `": "` and the error's display text are appended.
///
/// ```rust,ignore
/// let cmd = Command::new("SET").arg("SET").arg("key1").arg(42).arg(true);
/// assert_eq!(render::command_string(&cmd), "SET key1 42 true");
/// ```
pub fn command_string(cmd: &impl Cmder) -> String {
    let mut out = String::with_capacity(32);
    push_command(&mut out, cmd);
    out
}

/// Renders a pipeline, returning `(summary, full_text)`.
///
/// The full text joins per-command renderings with newlines, capped at 101
/// commands. The summary collects up to 10 distinct command names in
/// first-seen order, space-joined, with exact-match deduplication. An empty
/// pipeline yields two empty strings.
pub fn commands_string(cmds: &[impl Cmder]) -> (String, String) {
    let mut unique_names: Vec<&str> = Vec::with_capacity(NUM_NAME_LIMIT);
    let mut out = String::with_capacity(32 * cmds.len());

    for (i, cmd) in cmds.iter().enumerate() {
        if i > NUM_CMD_LIMIT {
            break;
        }
        if i > 0 {
            out.push('\n');
        }
        push_command(&mut out, cmd);

        if unique_names.len() >= NUM_NAME_LIMIT {
            continue;
        }
        let name = cmd.name();
        if !unique_names.contains(&name) {
            unique_names.push(name);
        }
    }

    (unique_names.join(" "), out)
}

/// Appends one command to `buf`. See [`command_string`].
pub fn push_command(buf: &mut String, cmd: &impl Cmder) {
    for (i, arg) in cmd.args().iter().enumerate() {
        if i > NUM_ARG_LIMIT {
            break;
        }
        if i > 0 {
            buf.push(' ');
        }
        push_arg(buf, arg);
    }

    if let Some(err) = cmd.err() {
        buf.push_str(": ");
        let _ = write!(buf, "{err}");
    }
}

/// Appends one argument to `buf`.
///
/// Scalar kinds take their exact textual form; text and binary kinds are
/// truncated to 64 bytes and then rendered UTF-8-safe (raw when every byte
/// is simple, lowercase hex otherwise). Floats use the shortest decimal that
/// round-trips, in fixed-point notation, computed in double precision.
pub fn push_arg(buf: &mut String, arg: &Arg) {
    match arg {
        Arg::Nil => buf.push_str("<nil>"),
        Arg::Str(v) => push_bounded_bytes(buf, v.as_bytes()),
        Arg::Bytes(v) => push_bounded_bytes(buf, v),
        Arg::I8(v) => {
            let _ = write!(buf, "{v}");
        }
        Arg::I16(v) => {
            let _ = write!(buf, "{v}");
        }
        Arg::I32(v) => {
            let _ = write!(buf, "{v}");
        }
        Arg::I64(v) => {
            let _ = write!(buf, "{v}");
        }
        Arg::U8(v) => {
            let _ = write!(buf, "{v}");
        }
        Arg::U16(v) => {
            let _ = write!(buf, "{v}");
        }
        Arg::U32(v) => {
            let _ = write!(buf, "{v}");
        }
        Arg::U64(v) => {
            let _ = write!(buf, "{v}");
        }
        Arg::F32(v) => {
            let _ = write!(buf, "{}", f64::from(*v));
        }
        Arg::F64(v) => {
            let _ = write!(buf, "{v}");
        }
        Arg::Bool(v) => buf.push_str(if *v { "true" } else { "false" }),
        Arg::Time(v) => buf.push_str(&v.to_rfc3339_opts(SecondsFormat::Nanos, true)),
        Arg::Other(v) => {
            let _ = write!(buf, "{v}");
        }
    }
}

/// Truncates to the argument length limit, then appends either the raw bytes
/// (all simple, hence ASCII) or their full hex encoding.
fn push_bounded_bytes(buf: &mut String, src: &[u8]) {
    let src = &src[..src.len().min(ARG_LEN_LIMIT)];
    if is_simple(src) {
        for &b in src {
            buf.push(b as char);
        }
    } else {
        for &b in src {
            let _ = write!(buf, "{b:02x}");
        }
    }
}

fn is_simple(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| SIMPLE[b as usize])
}

/// Bytes safe to embed raw in a single-line attribute value.
static SIMPLE: [bool; 256] = simple_table();

const fn simple_table() -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0;
    while i < 256 {
        let b = i as u8;
        table[i] = b.is_ascii_alphanumeric() || matches!(b, b'-' | b'+' | b'_' | b':');
        i += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, CommandError};
    use chrono::DateTime;
    use std::fmt;

    fn arg_string(arg: Arg) -> String {
        let mut out = String::new();
        push_arg(&mut out, &arg);
        out
    }

    #[test]
    fn renders_scalar_kinds_exactly() {
        assert_eq!(arg_string(Arg::Nil), "<nil>");
        assert_eq!(arg_string(Arg::I8(-8)), "-8");
        assert_eq!(arg_string(Arg::I64(i64::MIN)), "-9223372036854775808");
        assert_eq!(arg_string(Arg::U8(255)), "255");
        assert_eq!(arg_string(Arg::U64(u64::MAX)), "18446744073709551615");
        assert_eq!(arg_string(Arg::Bool(true)), "true");
        assert_eq!(arg_string(Arg::Bool(false)), "false");
        assert_eq!(arg_string(Arg::F64(3.5)), "3.5");
        assert_eq!(arg_string(Arg::F64(42.0)), "42");
    }

    #[test]
    fn renders_f32_in_double_precision() {
        // 0.1f32 is not exactly representable; the output is the shortest
        // decimal that round-trips its f64 promotion.
        assert_eq!(arg_string(Arg::F32(0.1)), "0.10000000149011612");
        assert_eq!(arg_string(Arg::F32(1.5)), "1.5");
    }

    #[test]
    fn renders_timestamp_as_rfc3339_nanos() {
        let t = DateTime::from_timestamp(0, 500).unwrap();
        assert_eq!(arg_string(Arg::Time(t)), "1970-01-01T00:00:00.000000500Z");
    }

    struct Point {
        x: i32,
        y: i32,
    }

    impl fmt::Display for Point {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "({},{})", self.x, self.y)
        }
    }

    #[test]
    fn renders_other_via_display() {
        let arg = Arg::Other(Box::new(Point { x: 1, y: 2 }));
        assert_eq!(arg_string(arg), "(1,2)");
    }

    #[test]
    fn simple_text_passes_through_unchanged() {
        assert_eq!(arg_string(Arg::Str("key:1-b+c_d".into())), "key:1-b+c_d");
    }

    #[test]
    fn simple_text_truncates_at_limit() {
        let long = "a".repeat(100);
        assert_eq!(arg_string(Arg::Str(long)), "a".repeat(64));
    }

    #[test]
    fn non_simple_text_hex_encodes_in_full() {
        // A space is outside the simple class.
        let rendered = arg_string(Arg::Str("hello world".into()));
        assert_eq!(rendered, "68656c6c6f20776f726c64");
        assert_eq!(rendered.len(), "hello world".len() * 2);
    }

    #[test]
    fn binary_hex_encodes() {
        assert_eq!(arg_string(Arg::Bytes(vec![0xff, 0x00])), "ff00");
    }

    #[test]
    fn binary_truncates_before_hex_decision() {
        // 70 non-simple bytes: truncated to 64, then hex doubles the length.
        let rendered = arg_string(Arg::Bytes(vec![0xffu8; 70]));
        assert_eq!(rendered.len(), 128);
        assert_eq!(rendered, "ff".repeat(64));
    }

    #[test]
    fn text_or_binary_output_never_exceeds_128_units() {
        let rendered = arg_string(Arg::Str("\u{1F600}".repeat(100)));
        assert!(rendered.len() <= 128);
    }

    #[test]
    fn command_renders_space_separated() {
        let cmd = Command::new("SET")
            .arg("SET")
            .arg("key1")
            .arg(42)
            .arg(true);
        assert_eq!(command_string(&cmd), "SET key1 42 true");
    }

    #[test]
    fn command_without_error_has_no_suffix() {
        let cmd = Command::new("GET").arg("GET").arg("key1");
        assert!(!command_string(&cmd).contains(": "));
    }

    #[test]
    fn command_error_appends_suffix() {
        let cmd = Command::new("GET")
            .arg("GET")
            .arg("missing")
            .with_error(CommandError::Nil);
        assert_eq!(command_string(&cmd), "GET missing: redis: nil");
    }

    #[test]
    fn command_caps_arguments_silently() {
        let mut cmd = Command::new("RPUSH");
        for i in 0..40 {
            cmd = cmd.arg(i64::from(i));
        }
        let rendered = command_string(&cmd);
        assert_eq!(rendered.split(' ').count(), 33);
        assert!(rendered.ends_with("32"));
        assert!(!rendered.contains("33"));
    }

    #[test]
    fn pipeline_renders_lines_and_summary() {
        let cmds = vec![
            Command::new("GET").arg("GET").arg("a"),
            Command::new("SET").arg("SET").arg("b").arg(1),
            Command::new("GET").arg("GET").arg("a"),
        ];
        let (summary, full) = commands_string(&cmds);
        assert_eq!(summary, "GET SET");
        assert_eq!(full, "GET a\nSET b 1\nGET a");
    }

    #[test]
    fn pipeline_caps_lines_and_names() {
        let cmds: Vec<Command> = (0..150)
            .map(|i| {
                let name = format!("CMD{i}");
                Command::new(&name).arg(name.as_str())
            })
            .collect();
        let (summary, full) = commands_string(&cmds);
        assert_eq!(full.lines().count(), 101);
        assert_eq!(summary.split(' ').count(), 10);
        assert_eq!(summary, "CMD0 CMD1 CMD2 CMD3 CMD4 CMD5 CMD6 CMD7 CMD8 CMD9");
    }

    #[test]
    fn empty_pipeline_renders_empty_strings() {
        let cmds: Vec<Command> = Vec::new();
        let (summary, full) = commands_string(&cmds);
        assert!(summary.is_empty());
        assert!(full.is_empty());
    }

    #[test]
    fn simple_table_matches_character_class() {
        for b in 0u16..256 {
            let b = b as u8;
            let expected =
                b.is_ascii_alphanumeric() || b == b'-' || b == b'+' || b == b'_' || b == b':';
            assert_eq!(SIMPLE[b as usize], expected, "byte {b:#04x}");
        }
    }
}
