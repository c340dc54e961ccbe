use std::cmp::Ordering;

/// A pacman version string split into `epoch:version-release`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PacmanVersion<'a> {
    pub epoch: &'a str,
    pub version: &'a str,
    pub release: Option<&'a str>,
}

impl<'a> From<&'a str> for PacmanVersion<'a> {
    fn from(s: &'a str) -> Self {
        //epoch is only the leading digits when followed by ':'
        let digits = s.bytes().take_while(u8::is_ascii_digit).count();
        let (epoch, rest) = if s[digits..].starts_with(':') {
            let epoch = &s[..digits];
            (if epoch.is_empty() { "0" } else { epoch }, &s[digits + 1..])
        } else {
            ("0", s)
        };

        let (version, release) = match rest.rsplit_once('-') {
            Some((ver, rel)) => (ver, Some(rel)),
            None => (rest, None),
        };

        PacmanVersion {
            epoch,
            version,
            release,
        }
    }
}

/// Compare two full package versions the way pacman does.
/// `Greater` means `a` is newer than `b`
pub fn vercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let a = PacmanVersion::from(a);
    let b = PacmanVersion::from(b);

    segment_cmp(a.epoch, b.epoch)
        .then_with(|| segment_cmp(a.version, b.version))
        .then_with(|| match (a.release, b.release) {
            (Some(ra), Some(rb)) => segment_cmp(ra, rb),
            _ => Ordering::Equal,
        })
}

/// Compare alphanumeric segments of a single version component
fn segment_cmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let a = a.as_bytes();
    let b = b.as_bytes();
    let (mut one, mut two) = (0, 0);

    while one < a.len() && two < b.len() {
        let sep_start_one = one;
        let sep_start_two = two;
        while one < a.len() && !a[one].is_ascii_alphanumeric() {
            one += 1;
        }
        while two < b.len() && !b[two].is_ascii_alphanumeric() {
            two += 1;
        }
        if one >= a.len() || two >= b.len() {
            break;
        }

        //more separators means a newer version
        let seps = (one - sep_start_one).cmp(&(two - sep_start_two));
        if seps != Ordering::Equal {
            return seps;
        }

        let is_num = a[one].is_ascii_digit();
        let same_kind = |c: &u8| {
            if is_num {
                c.is_ascii_digit()
            } else {
                c.is_ascii_alphabetic()
            }
        };
        let end_one = one + a[one..].iter().take_while(|c| same_kind(*c)).count();
        let end_two = two + b[two..].iter().take_while(|c| same_kind(*c)).count();

        //segments of different kinds, numeric wins
        if end_two == two {
            return if is_num {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let mut seg_one = &a[one..end_one];
        let mut seg_two = &b[two..end_two];
        if is_num {
            seg_one = strip_zeros(seg_one);
            seg_two = strip_zeros(seg_two);
            let len = seg_one.len().cmp(&seg_two.len());
            if len != Ordering::Equal {
                return len;
            }
        }
        let ord = seg_one.cmp(seg_two);
        if ord != Ordering::Equal {
            return ord;
        }

        one = end_one;
        two = end_two;
    }

    let rest_one = &a[one.min(a.len())..];
    let rest_two = &b[two.min(b.len())..];
    if rest_one.is_empty() && rest_two.is_empty() {
        return Ordering::Equal;
    }

    //whichever has a remaining alpha segment is older, otherwise the longer one is newer
    let one_alpha = rest_one.first().is_some_and(u8::is_ascii_alphabetic);
    let two_alpha = rest_two.first().is_some_and(u8::is_ascii_alphabetic);
    if (rest_one.is_empty() && !two_alpha) || one_alpha {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

fn strip_zeros(s: &[u8]) -> &[u8] {
    let zeros = s.iter().take_while(|c| **c == b'0').count();
    &s[zeros..]
}
