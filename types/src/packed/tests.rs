use proptest::prelude::*;

use crate::constants::{BLAKE160_SIZE, SIGNATURE_SIZE};
use crate::core::UserType;
use crate::packed::{
    Args, ArgsReader, Challenge, ChallengeReader, Nfts, Operations, Round, RoundReader, Script,
    ScriptReader, WitnessArgs, WitnessArgsReader,
};
use crate::prelude::Reader;

fn sample_nfts(count: usize, tag: u8) -> Nfts {
    let items: Vec<[u8; BLAKE160_SIZE]> = (0..count)
        .map(|i| {
            let mut item = [tag; BLAKE160_SIZE];
            item[0] = i as u8;
            item
        })
        .collect();
    Nfts::from_items(&items)
}

#[test]
fn args_accessors() {
    let args = Args::new_builder()
        .user_staking_ckb(5_000)
        .user_deck_size(3)
        .begin_blocknumber(1_000)
        .lock_code_hash([7u8; 32])
        .user1_pkhash([1u8; 20])
        .user2_pkhash([2u8; 20])
        .user1_nfts(sample_nfts(3, 0xaa))
        .user2_nfts(sample_nfts(3, 0xbb))
        .build();
    let reader = args.as_reader();
    assert_eq!(reader.user_staking_ckb(), 5_000);
    assert_eq!(reader.user_deck_size(), 3);
    assert_eq!(reader.begin_blocknumber(), 1_000);
    assert_eq!(reader.lock_code_hash(), &[7u8; 32]);
    assert_eq!(reader.user1_pkhash(), &[1u8; 20]);
    assert_eq!(reader.user2_pkhash(), &[2u8; 20]);
    assert_eq!(reader.user1_nfts().len(), 3);
    assert_eq!(reader.user2_nfts().get(2).unwrap()[0], 2);
    assert_eq!(reader.user2_nfts().get(3), None);
}

#[test]
fn round_accessors() {
    let operations = Operations::from_raw(&[vec![0x01, 0x02], vec![], vec![0xff]]);
    let round = Round::new_builder()
        .user_type(UserType::User2)
        .operations(operations)
        .build();
    let reader = round.as_reader();
    assert_eq!(reader.user_type(), UserType::User2);
    let ops = reader.operations();
    assert_eq!(ops.len(), 3);
    assert_eq!(ops.get(0).unwrap().raw_data(), &[0x01, 0x02]);
    assert_eq!(ops.get(1).unwrap().raw_data(), &[] as &[u8]);
    assert_eq!(ops.get(2).unwrap().raw_data(), &[0xff]);
    assert!(ops.get(3).is_none());
}

#[test]
fn round_rejects_unknown_user_type() {
    let round = Round::new_builder().user_type(UserType::User1).build();
    let mut data = round.as_slice().to_vec();
    // user_type sits right behind the 12-byte offset header
    data[12] = 3;
    assert!(RoundReader::verify(&data).is_err());
    data[12] = 0;
    assert!(RoundReader::verify(&data).is_err());
}

#[test]
fn challenge_accessors() {
    let round = Round::new_builder().user_type(UserType::User1).build();
    let challenge = Challenge::new_builder()
        .round_offset(4)
        .user_type(UserType::User2)
        .signature([9u8; SIGNATURE_SIZE])
        .round(round.as_slice())
        .build();
    let reader = challenge.as_reader();
    assert_eq!(reader.round_offset(), 4);
    assert_eq!(reader.user_type(), Some(UserType::User2));
    assert_eq!(reader.signature(), &[9u8; SIGNATURE_SIZE][..]);
    assert_eq!(reader.round().raw_data(), round.as_slice());
}

#[test]
fn challenge_unset_user_type() {
    let challenge = Challenge::new_builder().build();
    assert_eq!(challenge.as_reader().user_type_byte(), 0);
    assert_eq!(challenge.as_reader().user_type(), None);
}

#[test]
fn witness_args_slots() {
    let witness = WitnessArgs::new_builder()
        .lock(&[5u8; SIGNATURE_SIZE])
        .input_type(&[1, 2, 3])
        .build();
    let reader = witness.as_reader();
    assert_eq!(
        reader.lock().unwrap().raw_data(),
        &[5u8; SIGNATURE_SIZE][..]
    );
    assert_eq!(reader.input_type().unwrap().raw_data(), &[1, 2, 3]);
    assert!(reader.output_type().is_none());
}

#[test]
fn script_frame() {
    let script = Script::new_builder()
        .code_hash([3u8; 32])
        .hash_type(1)
        .args(&[0xde, 0xad])
        .build();
    let reader = script.as_reader();
    assert_eq!(reader.code_hash(), &[3u8; 32]);
    assert_eq!(reader.hash_type(), 1);
    assert_eq!(reader.args().raw_data(), &[0xde, 0xad]);
}

#[test]
fn truncated_frames_are_rejected() {
    let args = Args::new_builder().build();
    for cut in 0..args.as_slice().len() {
        assert!(
            ArgsReader::verify(&args.as_slice()[..cut]).is_err(),
            "truncation at {cut} accepted"
        );
    }
    let challenge = Challenge::new_builder().build();
    for cut in 0..challenge.as_slice().len() {
        assert!(ChallengeReader::verify(&challenge.as_slice()[..cut]).is_err());
    }
}

#[test]
fn garbage_is_rejected() {
    assert!(ScriptReader::verify(&[]).is_err());
    assert!(WitnessArgsReader::verify(&[0xff; 7]).is_err());
    assert!(RoundReader::verify(&[0u8; 4]).is_err());
}

proptest! {
    #[test]
    fn args_roundtrip(
        staking in any::<u64>(),
        deck in any::<u8>(),
        begin in any::<u64>(),
        nft_count in 0usize..8,
    ) {
        let args = Args::new_builder()
            .user_staking_ckb(staking)
            .user_deck_size(deck)
            .begin_blocknumber(begin)
            .user1_nfts(sample_nfts(nft_count, 0x11))
            .user2_nfts(sample_nfts(nft_count, 0x22))
            .build();
        let restored = Args::from_slice(args.as_slice()).unwrap();
        prop_assert_eq!(restored.as_slice(), args.as_slice());
        prop_assert_eq!(restored.as_reader().user_staking_ckb(), staking);
        prop_assert_eq!(restored.as_reader().begin_blocknumber(), begin);
        prop_assert_eq!(restored.as_reader().user1_nfts().len(), nft_count);
    }

    #[test]
    fn round_roundtrip(
        user in 1u8..3,
        chunks in proptest::collection::vec(
            proptest::collection::vec(any::<u8>(), 0..64),
            0..8,
        ),
    ) {
        let round = Round::new_builder()
            .user_type(UserType::from_wire(user).unwrap())
            .operations(Operations::from_raw(&chunks))
            .build();
        let restored = Round::from_slice(round.as_slice()).unwrap();
        prop_assert_eq!(restored.as_slice(), round.as_slice());
        let ops = restored.as_reader().operations();
        prop_assert_eq!(ops.len(), chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(ops.get(i).unwrap().raw_data(), &chunk[..]);
        }
    }

    #[test]
    fn challenge_roundtrip(
        offset in any::<u8>(),
        user in 1u8..3,
        sig in proptest::array::uniform32(any::<u8>()),
        round_bytes in proptest::collection::vec(any::<u8>(), 0..128),
    ) {
        let mut signature = [0u8; SIGNATURE_SIZE];
        signature[..32].copy_from_slice(&sig);
        let challenge = Challenge::new_builder()
            .round_offset(offset)
            .user_type(UserType::from_wire(user).unwrap())
            .signature(signature)
            .round(&round_bytes)
            .build();
        let restored = Challenge::from_slice(challenge.as_slice()).unwrap();
        prop_assert_eq!(restored.as_slice(), challenge.as_slice());
        prop_assert_eq!(restored.as_reader().round_offset(), offset);
        prop_assert_eq!(restored.as_reader().signature(), &signature[..]);
        prop_assert_eq!(restored.as_reader().round().raw_data(), &round_bytes[..]);
    }

    #[test]
    fn mutated_header_never_panics(
        data in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        // verify must reject or accept without panicking on arbitrary input
        let _ = ArgsReader::verify(&data);
        let _ = RoundReader::verify(&data);
        let _ = ChallengeReader::verify(&data);
        let _ = WitnessArgsReader::verify(&data);
        let _ = ScriptReader::verify(&data);
    }
}
