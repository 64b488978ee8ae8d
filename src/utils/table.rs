//! Plain-text table for CLI previews.

use unicode_width::UnicodeWidthStr;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    max_width: usize,
}

impl Table {
    /// Cells wider than `max_width` are cut with `…`.
    pub fn new<S: AsRef<str>>(headers: &[S], max_width: usize) -> Self {
        Self {
            headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
            max_width: max_width.max(2),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn clip(&self, s: &str) -> String {
        if UnicodeWidthStr::width(s) <= self.max_width {
            return s.to_string();
        }
        let mut out = String::new();
        for c in s.chars() {
            if UnicodeWidthStr::width(out.as_str()) + 2 > self.max_width {
                break;
            }
            out.push(c);
        }
        out.push('…');
        out
    }

    pub fn render(&self) -> String {
        let header: Vec<String> = self.headers.iter().map(|h| self.clip(h)).collect();
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| r.iter().map(|c| self.clip(c)).collect())
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| UnicodeWidthStr::width(h.as_str())).collect();
        for row in &body {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(UnicodeWidthStr::width(cell.as_str()));
            }
        }

        let line = |cells: &[String]| {
            let mut out = String::new();
            for (i, w) in widths.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let pad = w.saturating_sub(UnicodeWidthStr::width(cell));
                out.push_str(cell);
                out.push_str(&" ".repeat(pad + 2));
            }
            out.trim_end().to_string()
        };

        let mut out = line(&header);
        out.push('\n');
        out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
        out.push('\n');
        for row in &body {
            out.push_str(&line(row));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_and_clips() {
        let mut t = Table::new(&["row", "nome_cognome"], 8);
        t.add_row(vec!["2".into(), "Mario Rossi".into()]);
        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "row  nome_co…");
        assert_eq!(lines[2], "2    Mario R…");
    }
}
