//! Uselib inference from raw include spellings.

use std::collections::BTreeSet;

use autodep_build::UselibMap;

/// Infers library tags from a unit's raw include list.
///
/// Every slash-delimited prefix of every spelling is looked up, so
/// `boost/filesystem/path.hpp` checks `boost`, `boost/filesystem` and the
/// full spelling, accumulating all matches. Tags are added to `persistent`
/// (the entry's transitive set); the returned set holds only the tags found
/// in this call and is meant for the unit's own compile flags.
pub fn infer_uselib(
    map: &UselibMap,
    raw_deps: &[String],
    persistent: &mut BTreeSet<String>,
) -> BTreeSet<String> {
    let mut direct = BTreeSet::new();
    for dep in raw_deps {
        let mut end = 0;
        loop {
            let next = dep[end..].find('/').map(|i| end + i);
            let prefix = &dep[..next.unwrap_or(dep.len())];
            if let Some(tags) = map.get(prefix) {
                direct.extend(tags.iter().cloned());
            }
            match next {
                Some(slash) => end = slash + 1,
                None => break,
            }
        }
    }
    persistent.extend(direct.iter().cloned());
    direct
}
