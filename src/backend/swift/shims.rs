//! Runtime helpers appended after the declarations.
//!
//! Each helper is written only if some construct activated it during the run. The texts are kept as line
//! templates: a lone `{` opens a block, a lone `}` closes one, and an empty line stays empty, so the helpers follow
//! the configured indentation like the rest of the output.

use super::SwiftEmitter;
use super::context::Shim;
use crate::backend::writer::CodeSink;

const CI_ERROR: &str = "\
public enum CiError : Error
{
case error(String)
}";

const ARRAY_REF: &str = "\
public class ArrayRef<T> : Sequence
{
var array : [T]

init(_ array : [T])
{
self.array = array
}

init(repeating: T, count: Int)
{
self.array = [T](repeating: repeating, count: count)
}

init(factory: () -> T, count: Int)
{
self.array = (1...count).map({_ in factory() })
}

subscript(index: Int) -> T
{
get
{
return array[index]
}
set(value)
{
array[index] = value
}
}
subscript(bounds: Range<Int>) -> ArraySlice<T>
{
get
{
return array[bounds]
}
set(value)
{
array[bounds] = value
}
}

func fill(_ value: T)
{
array = [T](repeating: value, count: array.count)
}

func fill(_ value: T, _ startIndex : Int, _ count : Int)
{
array[startIndex ..< startIndex + count] = ArraySlice(repeating: value, count: count)
}

public func makeIterator() -> IndexingIterator<Array<T>>
{
return array.makeIterator()
}
}";

const STRING_CHAR_AT: &str = "\
fileprivate func ciStringCharAt(_ s: String, _ offset: Int) -> Int
{
return Int(s.unicodeScalars[s.index(s.startIndex, offsetBy: offset)].value)
}";

const STRING_INDEX_OF: &str = "\
fileprivate func ciStringIndexOf<S1 : StringProtocol, S2 : StringProtocol>(_ haystack: S1, _ needle: S2, _ options: String.CompareOptions = .literal) -> Int
{
guard let index = haystack.range(of: needle, options: options) else { return -1 }
return haystack.distance(from: haystack.startIndex, to: index.lowerBound)
}";

const STRING_SUBSTRING: &str = "\
fileprivate func ciStringSubstring(_ s: String, _ offset: Int) -> Substring
{
return s[s.index(s.startIndex, offsetBy: offset)...]
}";

fn template(shim: Shim) -> &'static str {
    match shim {
        Shim::CiError => CI_ERROR,
        Shim::ArrayRef => ARRAY_REF,
        Shim::StringCharAt => STRING_CHAR_AT,
        Shim::StringIndexOf => STRING_INDEX_OF,
        Shim::StringSubstring => STRING_SUBSTRING,
    }
}

impl<'a> SwiftEmitter<'a> {
    /// Write every activated helper in [`Shim`] order.
    pub(crate) fn write_library(&mut self) {
        let active: Vec<Shim> = self.ctx.shims().collect();
        for shim in active {
            tracing::trace!(shim = shim.name(), "writing runtime helper");
            self.out.separate();
            self.write_template(template(shim));
        }
    }

    fn write_template(&mut self, text: &str) {
        for line in text.lines() {
            match line {
                "{" => self.out.open_block(),
                "}" => self.out.close_block(),
                "" => self.out.newline(),
                _ => self.out.write_line(line),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::config::EmitConfig;
    use crate::backend::writer::SourceWriter;
    use ciswift_ast::Program;

    fn library(shims: &[Shim]) -> String {
        let program = Program::default();
        let config = EmitConfig::new().with_spaces(2);
        let mut emitter = SwiftEmitter::new(&program, &config);
        for shim in shims {
            emitter.ctx.activate(*shim);
        }
        emitter.write_library();
        std::mem::replace(&mut emitter.out, SourceWriter::new(&config)).finish()
    }

    #[test]
    fn test_nothing_active_writes_nothing() {
        assert_eq!(library(&[]), "");
    }

    #[test]
    fn test_error_type() {
        assert_eq!(library(&[Shim::CiError]), "public enum CiError : Error\n{\n  case error(String)\n}\n");
    }

    #[test]
    fn test_helpers_follow_fixed_order() {
        let text = library(&[Shim::StringSubstring, Shim::CiError, Shim::StringCharAt]);
        let error = text.find("enum CiError").unwrap();
        let char_at = text.find("func ciStringCharAt").unwrap();
        let substring = text.find("func ciStringSubstring").unwrap();
        assert!(error < char_at && char_at < substring);
        assert!(text.contains("}\n\nfileprivate func ciStringCharAt"));
    }

    #[test]
    fn test_array_ref_nesting() {
        let text = library(&[Shim::ArrayRef]);
        assert!(text.starts_with("public class ArrayRef<T> : Sequence\n{\n  var array : [T]\n\n  init(_ array : [T])\n"));
        assert!(text.contains("\n    get\n    {\n      return array[index]\n    }\n"));
        assert!(text.ends_with("  public func makeIterator() -> IndexingIterator<Array<T>>\n  {\n    return array.makeIterator()\n  }\n}\n"));
    }
}
