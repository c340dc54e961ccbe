use std::cmp::Ordering;

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with binary units, e.g. 1536 -> "1.50 KB"
/// Only promotes while the value is strictly greater than 1024, so 1024 stays "1024.00 B".
/// Divides in single precision, which decides the last rounded digit of large sizes
pub fn size_to_string(size: i64) -> String {
    let mut fsize = size as f32;
    let mut unit = 0;
    while fsize > 1024.0 && unit < SIZE_UNITS.len() - 1 {
        fsize /= 1024.0;
        unit += 1;
    }
    format!("{fsize:.2} {}", SIZE_UNITS[unit])
}

/// Trim spaces, tabs and newlines. A missing value becomes an empty string
pub fn trim_str(s: Option<&str>) -> String {
    s.map(|s| s.trim_matches([' ', '\t', '\n']).to_string())
        .unwrap_or_default()
}

/// Natural sort comparison of two strings
/// So that "file2" < "file10"
/// Split into number and string tokens
/// Compare number tokens numerically, string tokens lexicographically
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let tokens_a = get_tokens(a);
    let tokens_b = get_tokens(b);

    for (a, b) in tokens_a.iter().zip(tokens_b.iter()) {
        let or = match (a, b) {
            (Token::Number(a), Token::Number(b)) => a.cmp(b),
            (Token::Number(_), Token::String(_)) => Ordering::Less,
            (Token::String(_), Token::Number(_)) => Ordering::Greater,
            (Token::String(a), Token::String(b)) => a.cmp(b),
        };
        if or != Ordering::Equal {
            return or;
        }
    }
    tokens_a.len().cmp(&tokens_b.len()) //in case different length but equal up to the shortest
}
enum Token {
    Number(u64),
    String(String),
}
fn get_tokens(s: &str) -> Vec<Token> {
    let mut tokens = vec![];
    let mut it = s.chars().peekable();
    loop {
        let Some(c) = it.next() else {
            break;
        };

        if c.is_numeric() {
            let mut s = String::from(c);
            while let Some(n) = it.peek() {
                if n.is_numeric() {
                    s.push(*n);
                    it.next();
                } else {
                    break;
                }
            }
            match s.parse::<u64>() {
                Ok(num) => tokens.push(Token::Number(num)),
                Err(_) => tokens.push(Token::String(s)),
            }
        } else {
            let mut s = String::from(c);
            while let Some(c) = it.peek() {
                if !c.is_numeric() {
                    s.push(*c);
                    it.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::String(s));
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_natural() {
        assert_eq!(natural_cmp("file2.txt", "file3.txt"), Ordering::Less);
        assert_eq!(natural_cmp("file2.txt", "file1.txt"), Ordering::Greater);
        assert_eq!(natural_cmp("file2.txt", "file10.txt"), Ordering::Less);
        assert_eq!(natural_cmp("file2.txt", "file10.t"), Ordering::Less);
        assert_eq!(natural_cmp("file2.t", "file10.txt"), Ordering::Less);
        assert_eq!(natural_cmp("file10.txt", "file2.txt"), Ordering::Greater);
        assert_eq!(natural_cmp("file10.txt", "file10.txt"), Ordering::Equal);

        assert_eq!(natural_cmp("1.1.1", "1.2.1"), Ordering::Less);
        assert_eq!(natural_cmp("1.1.2", "1.2.1"), Ordering::Less);
        assert_eq!(natural_cmp("2.1.1", "1.1.1"), Ordering::Greater);

        assert_eq!(natural_cmp("101551814", "317460852"), Ordering::Less);
        assert_eq!(natural_cmp("101551814", "10000564123"), Ordering::Less);
        assert_eq!(natural_cmp("101235555", "10406325"), Ordering::Greater);
        assert_eq!(natural_cmp("101235555", "8219"), Ordering::Greater);
    }

    #[test]
    fn test_size_to_string() {
        assert_eq!(size_to_string(0), "0.00 B");
        assert_eq!(size_to_string(512), "512.00 B");
        assert_eq!(size_to_string(1024), "1024.00 B");
        assert_eq!(size_to_string(1025), "1.00 KB");
        assert_eq!(size_to_string(1536), "1.50 KB");
        assert_eq!(size_to_string(1024 * 1024 * 2), "2.00 MB");
        assert_eq!(size_to_string(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(size_to_string(1024_i64.pow(4) * 5), "5.00 TB");
        //no unit beyond TB
        assert_eq!(size_to_string(1024_i64.pow(5) * 2), "2048.00 TB");
        assert_eq!(size_to_string(i64::MAX), "8388608.00 TB");
        //single precision: 16777217 is not representable and reads as 2^24
        assert_eq!(size_to_string(16_777_217), size_to_string(16_777_216));
    }

    #[test]
    fn test_size_to_string_scales_back() {
        for size in [1, 999, 1023, 4097, 123_456, 98_765_432, 5_000_000_000, 1 << 45] {
            let formatted = size_to_string(size);
            let (num, unit) = formatted.split_once(' ').unwrap();
            let num: f64 = num.parse().unwrap();
            let power = SIZE_UNITS.iter().position(|u| *u == unit).unwrap();
            let factor = 1024_f64.powi(power as i32);
            assert!(
                (num * factor - size as f64).abs() <= 0.005 * factor,
                "{size} -> {formatted}"
            );
        }
    }

    #[test]
    fn test_trim_str() {
        assert_eq!(trim_str(Some("  name\t\n")), "name");
        assert_eq!(trim_str(Some("\n\tinner space kept  ")), "inner space kept");
        assert_eq!(trim_str(Some(" \t\n ")), "");
        assert_eq!(trim_str(Some("")), "");
        assert_eq!(trim_str(None), "");
    }
}
