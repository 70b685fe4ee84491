use fuzzdex::{compare, hash_bytes, hash_bytes_with, FuzzyError, FuzzyHasher, HashOptions};

const NEAR_A: &str = "192:sdrtCMPFGVk+1cvtuIyeEUGZnhbvC6VsyYT6k8ylgKCaLizoQSbl:I5+7eVvwUL7gKCpzNSbl";
const NEAR_B: &str = "192:/rtCMPFGVk+1cvtuIyeEUGZnhbvC6VsyYT6k8ylgKCaLizoQSbl:/5+7eVvwUL7gKCpzNSbl";

fn is_well_formed(fp: &str, part2_limit: usize) -> bool {
    let mut fields = fp.splitn(3, ':');
    let (bs, p1, p2) = match (fields.next(), fields.next(), fields.next()) {
        (Some(bs), Some(p1), Some(p2)) => (bs, p1, p2),
        _ => return false,
    };
    let symbols = |s: &str| s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/');
    !bs.is_empty()
        && bs.bytes().all(|b| b.is_ascii_digit())
        && symbols(p1)
        && symbols(p2)
        && p1.len() <= 64
        && p2.len() <= part2_limit
}

#[test]
fn test_hash_vectors() {
    assert_eq!(hash_bytes(b"").unwrap(), "3::");
    assert_eq!(hash_bytes(b"a").unwrap(), "3:E:E");
    assert_eq!(hash_bytes(&b"ab".repeat(10)).unwrap(), "3:ue:ue");
    assert_eq!(hash_bytes(&b"ab".repeat(10_000)).unwrap(), "3:ui:ui");
}

#[test]
fn test_compare_vectors() {
    assert_eq!(compare("3:E:E", "3:E:E").unwrap(), 100);
    assert_eq!(compare("3:E:E", "3:ue:ue").unwrap(), 0);
    assert_eq!(compare("3:ue:ue", "3:E:E").unwrap(), 0);
    assert_eq!(compare("3:E:E", "3:ui:ui").unwrap(), 0);
    assert_eq!(compare("3:E:E", NEAR_B).unwrap(), 0);
    assert_eq!(compare(NEAR_A, NEAR_B).unwrap(), 99);
    assert_eq!(compare(NEAR_B, NEAR_A).unwrap(), 99);
    assert_eq!(compare(NEAR_B, NEAR_B).unwrap(), 100);
}

#[test]
fn test_compare_argument_errors() {
    for (a, b) in [("", "3:E:E"), ("3:E:E", ""), ("", "3::"), ("3::", "")] {
        assert!(matches!(compare(a, b), Err(FuzzyError::InvalidArgument(_))), "{:?} vs {:?}", a, b);
    }
    assert!(compare("3:E", "3:E:E").is_err());
    assert!(compare("3:E:E", "nonsense").is_err());
}

#[test]
fn test_chunked_feeding_matches_one_shot() {
    let data: Vec<u8> = (0..100_000u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect();
    let expected = hash_bytes(&data).unwrap();

    let mut hasher = FuzzyHasher::new();
    let mut offset = 0;
    let mut step = 1;
    while offset < data.len() {
        let end = (offset + step).min(data.len());
        hasher.update(&data[offset..end]);
        offset = end;
        step = step * 3 % 1021 + 1;
    }
    assert_eq!(hasher.finish().unwrap(), expected);
}

#[test]
fn test_format_and_self_similarity() {
    let mut data = Vec::new();
    let mut x: u32 = 12_345;
    for len in [10usize, 500, 5_000, 50_000, 300_000] {
        data.clear();
        for _ in 0..len {
            x = x.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            data.push((x >> 24) as u8);
        }
        for options in [
            HashOptions::default(),
            HashOptions { eliminate_sequences: true, do_not_truncate: false },
            HashOptions { eliminate_sequences: false, do_not_truncate: true },
        ] {
            let fp = hash_bytes_with(&data, options).unwrap();
            let limit = if options.do_not_truncate { 64 } else { 32 };
            assert!(is_well_formed(&fp, limit), "{}", fp);
            assert_eq!(compare(&fp, &fp).unwrap(), 100);
        }
    }
}

#[test]
fn test_compare_is_symmetric() {
    let base: Vec<u8> = (0..60_000u32).map(|i| (i.wrapping_mul(40_503) >> 7) as u8).collect();
    let mut edited = base.clone();
    for b in edited[30_000..30_400].iter_mut() {
        *b = b.wrapping_add(1);
    }
    let a = hash_bytes(&base).unwrap();
    let b = hash_bytes(&edited).unwrap();
    assert_eq!(compare(&a, &b).unwrap(), compare(&b, &a).unwrap());
}
