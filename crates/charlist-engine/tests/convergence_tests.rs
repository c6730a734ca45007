// Property tests for tag reconciliation.
// Applying desired set A and then B leaves exactly B linked, and catalog rows
// for names in both sets keep their id and colour.

use charlist_core::model::{Character, CharacterTag, Color, TagDraft};
use charlist_core::timestamp;
use charlist_engine::CharacterRepository;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn tag_names() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-f]{1,2}", 0..6)
}

/// Desired list for `names`; names already in the catalog are passed as
/// stored tags unless `as_drafts` is set
fn desired_tags(
    repo: &CharacterRepository,
    names: &BTreeSet<String>,
    color: Color,
    as_drafts: bool,
) -> Vec<CharacterTag> {
    let catalog = repo.get_all_tags().unwrap();
    names
        .iter()
        .map(|name| match catalog.iter().find(|t| &t.name == name) {
            Some(tag) if !as_drafts => CharacterTag::Stored(tag.clone()),
            _ => CharacterTag::Draft(TagDraft::new(name.clone(), color)),
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_tag_sync_converges(a in tag_names(), b in tag_names(), as_drafts in any::<bool>()) {
        let repo = CharacterRepository::open_in_memory().unwrap();
        let start = timestamp::parse("2023-01-01 12:00:00").unwrap();
        let character = repo
            .add_character(Character::new("Prop", "Test", start, "/p"))
            .unwrap();

        let mut character = character;
        character.tags = desired_tags(&repo, &a, Color::RED, as_drafts);
        let character = repo.update_character(character).unwrap();

        let before: BTreeMap<String, _> = repo
            .get_all_tags()
            .unwrap()
            .into_iter()
            .map(|t| (t.name.clone(), (t.id, t.color)))
            .collect();

        let mut character = character;
        character.tags = desired_tags(&repo, &b, Color::BLUE, as_drafts);
        let updated = repo.update_character(character).unwrap();

        let linked: BTreeSet<String> = updated.tag_names().into_iter().map(String::from).collect();
        prop_assert_eq!(&linked, &b);
        prop_assert_eq!(updated.tags.len(), b.len());

        let after: BTreeMap<String, _> = repo
            .get_all_tags()
            .unwrap()
            .into_iter()
            .map(|t| (t.name.clone(), (t.id, t.color)))
            .collect();
        for name in a.intersection(&b) {
            prop_assert_eq!(before.get(name), after.get(name));
        }

        let reloaded = repo.get_character(updated.id).unwrap().unwrap();
        let reloaded: BTreeSet<String> = reloaded.tag_names().into_iter().map(String::from).collect();
        prop_assert_eq!(reloaded, b);
    }
}
