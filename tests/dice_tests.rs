mod common;

use common::Scripted;
use waids_wyverns::dice::{DiceError, DiceMacro, DiceRoller, DieType};
use waids_wyverns::rng::RngService;

fn scripted(faces: &[u32]) -> DiceRoller {
    DiceRoller::new(Scripted::new(faces))
}

#[test]
fn roll_die_stays_in_range() {
    let mut roller = DiceRoller::new(RngService::with_seed(5).derive_stream_by_name("dice"));
    for die in DieType::ALL {
        for _ in 0..200 {
            let face = roller.roll_die(die);
            assert!((1..=die.sides()).contains(&face), "{die} rolled {face}");
        }
    }
}

#[test]
fn roll_many_adds_modifier_once() {
    let mut roller = scripted(&[1]);
    let result = roller.roll_many(1, DieType::D4, 2);
    assert_eq!(result.rolls, vec![1]);
    assert_eq!(result.modifier, 2);
    assert_eq!(result.total, 3);

    let mut roller = scripted(&[3, 4]);
    let result = roller.roll_many(2, DieType::D6, -1);
    assert_eq!(result.total, 6);
    assert_eq!(result.to_string(), "[3, 4] -1 = 6");
}

#[test]
fn zero_dice_is_just_the_modifier() {
    let mut roller = scripted(&[]);
    let result = roller.roll_many(0, DieType::D6, 5);
    assert!(result.rolls.is_empty());
    assert_eq!(result.total, 5);
}

#[test]
fn advantage_keeps_higher_disadvantage_lower() {
    let mut roller = scripted(&[3, 5, 6, 4]);
    let adv = roller.advantage_disadvantage(true, DieType::D20);
    assert_eq!(adv.rolls, [3, 5]);
    assert_eq!(adv.selected, 5);
    let dis = roller.advantage_disadvantage(false, DieType::D20);
    assert_eq!(dis.rolls, [6, 4]);
    assert_eq!(dis.selected, 4);
}

#[test]
fn unsupported_die_is_rejected() {
    assert_eq!(
        DieType::from_sides(7),
        Err(DiceError::UnsupportedDie("d7".to_string()))
    );
    assert!("d3".parse::<DieType>().is_err());
    assert_eq!("D12".parse::<DieType>(), Ok(DieType::D12));
}

#[test]
fn macro_rolls_each_block_and_one_modifier() {
    let recipe = DiceMacro::new("fireball", 3)
        .with_dice(DieType::D6, 2)
        .with_dice(DieType::D4, 1)
        .with_dice(DieType::D6, 1);
    assert_eq!(recipe.to_string(), "fireball: 3d6 + 1d4 +3");

    let mut roller = scripted(&[1, 2, 3, 4]);
    let result = roller.roll_macro(&recipe);
    assert_eq!(
        result.blocks,
        vec![(DieType::D6, vec![1, 2, 3]), (DieType::D4, vec![4])]
    );
    assert_eq!(result.total, 1 + 2 + 3 + 4 + 3);
}

#[test]
fn empty_macro() {
    let recipe = DiceMacro::new("nothing", 0).with_dice(DieType::D8, 0);
    assert!(recipe.is_empty());
    let mut roller = scripted(&[]);
    assert_eq!(roller.roll_macro(&recipe).total, 0);
}
