//! Walks an Indexed Merkle Map through the life of one key: insert it, prove it present,
//! prove a greater key absent, update it, and prove the old value gone. Every witness is
//! submitted to a ledger holding only the root, and printed in wire form.

use anyhow::{anyhow, ensure, Context as _, Result};
use clap::Parser;
use imm::{IndexedMerkleMap, Ledger, Options, Receipt, SystemClock};
use imm_core::{
    codec::encode_hex32,
    tree::key_from_u256,
    wire::{self, WireWitness},
    Key, Witness,
};
use ruint::aliases::U256;

mod logging;

#[derive(Parser, Debug)]
#[command(about = "Indexed Merkle Map witness walkthrough")]
struct Cli {
    /// The key to insert and update, as a decimal or 0x-prefixed integer.
    #[arg(long, default_value = "44")]
    key: String,
    /// The value first stored under the key.
    #[arg(long, default_value = "900")]
    value: String,
    /// The value the key is updated to.
    #[arg(long, default_value = "950")]
    new_value: String,
    /// A key greater than `key`, proven absent.
    #[arg(long, default_value = "1000")]
    absent: String,
    /// Print the wire form of every witness.
    #[arg(long)]
    json: bool,
}

fn parse_key(s: &str) -> Result<Key> {
    let n: U256 = s.parse().map_err(|e| anyhow!("invalid integer {:?}: {}", s, e))?;
    Ok(key_from_u256(n))
}

fn print(cli: &Cli, witness: &Witness) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(&WireWitness::from(witness))?;
        println!("{}", json);
    }
    Ok(())
}

fn query(ledger: &Ledger, witness: Witness) -> Result<bool> {
    match ledger.submit(&witness)? {
        Receipt::Query { holds } => Ok(holds),
        Receipt::Committed { .. } => Err(anyhow!("query committed a transition")),
    }
}

fn main() -> Result<()> {
    logging::init()?;
    let cli = Cli::parse();

    let key = parse_key(&cli.key).context("--key")?;
    let value = parse_key(&cli.value).context("--value")?;
    let new_value = parse_key(&cli.new_value).context("--new-value")?;
    let absent = parse_key(&cli.absent).context("--absent")?;
    ensure!(key < absent, "--absent must be greater than --key");
    ensure!(value != new_value, "--new-value must differ from --value");

    let mut map = IndexedMerkleMap::new(Options::new());
    let ledger = Ledger::new(map.root(), SystemClock);
    tracing::info!(root = %encode_hex32(&ledger.root()), "genesis");

    // Insert.
    let insert = map.build_insert_witness(key, value)?;
    ensure!(
        wire::verify_insert(&(&insert).into()) == Ok(insert.new_root),
        "wire form of the insert witness does not verify"
    );
    let witness = Witness::Insert(insert.clone());
    print(&cli, &witness)?;
    ledger.submit(&witness)?;
    map.apply_insert(&insert)?;
    tracing::info!(root = %encode_hex32(&ledger.root()), key = %cli.key, "inserted");

    // Query.
    let present = map
        .membership_proof(&key)
        .context("inserted key has no membership proof")?;
    ensure!(present.leaf.value == value, "inserted key holds the wrong value");
    let present = Witness::Membership(present);
    print(&cli, &present)?;
    ensure!(query(&ledger, present)?, "inserted key is not a member");

    let gap = map
        .non_membership_proof(&absent)
        .context("absent key is present")?;
    let gap = Witness::NonMembership(gap);
    print(&cli, &gap)?;
    ensure!(query(&ledger, gap)?, "absent key is not proven absent");
    tracing::info!(key = %cli.absent, "proven absent");

    // Update.
    let update = map.build_update_witness(key, new_value)?;
    let witness = Witness::Update(update.clone());
    print(&cli, &witness)?;
    ledger.submit(&witness)?;
    map.apply_update(&update)?;
    tracing::info!(root = %encode_hex32(&ledger.root()), value = %cli.new_value, "updated");

    let mut stale = map
        .membership_proof(&key)
        .context("updated key has no membership proof")?;
    ensure!(query(&ledger, Witness::Membership(stale.clone()))?, "updated value is not a member");
    stale.leaf.value = value;
    ensure!(
        !query(&ledger, Witness::Membership(stale))?,
        "old value is still a member"
    );

    let state = ledger.state();
    println!(
        "root {} length {} updated_at {}",
        encode_hex32(&state.root),
        state.tree_length,
        state.updated_at
    );
    Ok(())
}
