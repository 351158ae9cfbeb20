use rolo::features::clients::{ClientRecord, PageLink, PageSummary, ValidationReport};
use std::io::{self, Write};

pub(crate) fn records<W: Write>(out: &mut W, records: &[&ClientRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No clients found.");
    }

    let name_width = records.iter().map(|r| r.name.chars().count()).max().unwrap_or(0).max(6);
    let email_width = records.iter().map(|r| r.email.chars().count()).max().unwrap_or(0).max(5);

    writeln!(out, "{:<12}  {:<name_width$}  {:<email_width$}  PHONE", "ID", "NAME", "EMAIL")?;
    for record in records {
        writeln!(
            out,
            "{:<12}  {:<name_width$}  {:<email_width$}  {}",
            record.id.as_str(),
            record.name,
            record.email,
            record.phone.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(())
}

pub(crate) fn pagination<W: Write>(
    out: &mut W,
    summary: &PageSummary,
    links: &[PageLink],
    current: usize,
) -> io::Result<()> {
    writeln!(out, "{summary}")?;
    if links.is_empty() {
        return Ok(());
    }

    let rendered: Vec<String> = links
        .iter()
        .map(|link| match link {
            PageLink::Page(page) if *page == current => format!("[{page}]"),
            PageLink::Page(page) => page.to_string(),
            PageLink::Gap => "...".to_owned(),
        })
        .collect();
    writeln!(out, "Pages: {}", rendered.join(" "))
}

pub(crate) fn violations<W: Write>(out: &mut W, report: &ValidationReport) -> io::Result<()> {
    for violation in report.iter() {
        writeln!(out, "  {}: {}", violation.field, violation.reason)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rolo::features::clients::{ClientId, Field, ViolationKind};

    fn record(name: &str, email: &str, phone: Option<&str>) -> ClientRecord {
        ClientRecord {
            id: ClientId::from("abcdefghjkmn"),
            name: name.to_owned(),
            email: email.to_owned(),
            phone: phone.map(str::to_owned),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rows_are_aligned() {
        let ana = record("Ana Pérez", "a@x.com", Some("600123456"));
        let luis = record("Luis", "luis@example.org", None);
        let mut out = Vec::new();
        records(&mut out, &[&ana, &luis]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(&format!("{:<12}  NAME", "ID")));
        assert!(lines[1].ends_with("600123456"));
        assert!(lines[2].ends_with("  -"));
    }

    #[test]
    fn empty_listing_says_so() {
        let mut out = Vec::new();
        records(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No clients found.\n");
    }

    #[test]
    fn current_page_is_bracketed() {
        let summary = PageSummary { from: 11, to: 20, total: 42 };
        let links = [PageLink::Page(1), PageLink::Page(2), PageLink::Gap, PageLink::Page(5)];
        let mut out = Vec::new();
        pagination(&mut out, &summary, &links, 2).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Showing 11 to 20 of 42 results\nPages: 1 [2] ... 5\n"
        );
    }

    #[test]
    fn violations_are_listed_per_field() {
        let reason = "Email format is invalid";
        let report = ValidationReport::single(Field::Email, ViolationKind::Format, reason);
        let mut out = Vec::new();
        violations(&mut out, &report).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "  email: Email format is invalid\n");
    }
}
