use rustyline::{error::ReadlineError, Editor};
use std::str::FromStr;

pub enum ReadAndParseUserEntryRes<T>
where
    T: FromStr,
{
    Ok(T),
    EmptyEntry,
    ParseErr {
        e: <T as FromStr>::Err,
        user_entry: String,
    },
    ReadErr(ReadlineError),
}

pub fn parse_user_entry<T>(user_entry: String) -> ReadAndParseUserEntryRes<T>
where
    T: FromStr,
{
    let trimmed = user_entry.trim();
    if trimmed.is_empty() {
        ReadAndParseUserEntryRes::EmptyEntry
    } else {
        match trimmed.parse::<T>() {
            Ok(e) => ReadAndParseUserEntryRes::Ok(e),
            Err(e) => ReadAndParseUserEntryRes::ParseErr { e, user_entry },
        }
    }
}

pub fn read_and_parse_user_entry<T>(editor: &mut Editor<()>, msg: &str) -> ReadAndParseUserEntryRes<T>
where
    T: FromStr,
{
    match editor.readline(&format!("{}: ", msg)) {
        Ok(user_entry) => parse_user_entry(user_entry),
        Err(e) => ReadAndParseUserEntryRes::ReadErr(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_entry_is_empty() {
        assert!(matches!(
            parse_user_entry::<u32>("   ".to_string()),
            ReadAndParseUserEntryRes::EmptyEntry
        ));
    }

    #[test]
    fn entry_is_trimmed_before_parse() {
        match parse_user_entry::<u32>(" 9600 ".to_string()) {
            ReadAndParseUserEntryRes::Ok(baud_rate) => assert_eq!(baud_rate, 9600),
            _ => panic!("expected a parsed baud rate"),
        }
    }

    #[test]
    fn parse_error_keeps_entry() {
        match parse_user_entry::<usize>("two".to_string()) {
            ReadAndParseUserEntryRes::ParseErr { user_entry, .. } => assert_eq!(user_entry, "two"),
            _ => panic!("expected a parse error"),
        }
    }
}
