//! Line-oriented C# writer with an explicit scope stack.

/// An open scope; conditional scopes that were skipped close without output.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Scope {
    Block { closer: String },
    Flat,
}

#[derive(Debug, Clone)]
pub struct SourceWriter {
    out: String,
    indent: String,
    scopes: Vec<Scope>,
    depth: usize,
    /// Last written line was blank or opened a block.
    fresh: bool,
}

impl SourceWriter {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            out: String::new(),
            indent: indent.into(),
            scopes: Vec::new(),
            depth: 0,
            fresh: true,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        for part in text.split('\n') {
            if part.is_empty() {
                self.out.push('\n');
                continue;
            }
            for _ in 0..self.depth {
                self.out.push_str(&self.indent);
            }
            self.out.push_str(part);
            self.out.push('\n');
        }
        self.fresh = false;
    }

    /// A blank separator line; never doubled and never right after `{`.
    pub fn blank(&mut self) {
        if !self.fresh {
            self.out.push('\n');
            self.fresh = true;
        }
    }

    /// `header` followed by a braced block.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.open_with(header, "}");
    }

    /// Like [`open`](Self::open) with a custom closing line such as `};`.
    pub fn open_with(&mut self, header: impl AsRef<str>, closer: impl Into<String>) {
        self.line(header);
        self.line("{");
        self.depth += 1;
        self.scopes.push(Scope::Block {
            closer: closer.into(),
        });
        self.fresh = true;
    }

    /// Opens a block only when `condition` holds; [`close`](Self::close) balances either way.
    pub fn open_if(&mut self, condition: bool, header: impl AsRef<str>) {
        if condition {
            self.open(header);
        } else {
            self.scopes.push(Scope::Flat);
        }
    }

    pub fn close(&mut self) {
        if let Some(Scope::Block { closer }) = self.scopes.pop() {
            if self.out.ends_with("\n\n") {
                self.out.pop();
            }
            self.depth = self.depth.saturating_sub(1);
            self.line(closer);
        }
    }

    /// Closes every open scope and returns the text.
    pub fn finish(mut self) -> String {
        while !self.scopes.is_empty() {
            self.close();
        }
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_blocks() {
        let mut w = SourceWriter::new("\t");
        w.open("class A");
        w.open("void M()");
        w.line("return;");
        w.close();
        w.close();
        assert_eq!(w.finish(), "class A\n{\n\tvoid M()\n\t{\n\t\treturn;\n\t}\n}\n");
    }

    #[test]
    fn test_skipped_scope_keeps_balance() {
        let mut w = SourceWriter::new("  ");
        w.open("outer");
        w.open_if(false, "if (x)");
        w.line("call();");
        w.close();
        w.line("after();");
        let text = w.finish();
        assert_eq!(text, "outer\n{\n  call();\n  after();\n}\n");
    }

    #[test]
    fn test_blank_lines_are_collapsed() {
        let mut w = SourceWriter::new("\t");
        w.blank();
        w.open_with("var x = new X", "};");
        w.blank();
        w.line("A = 1,");
        w.blank();
        w.blank();
        w.close();
        assert_eq!(w.finish(), "var x = new X\n{\n\tA = 1,\n};\n");
    }
}
