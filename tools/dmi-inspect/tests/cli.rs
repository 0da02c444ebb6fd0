use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;

fn fix_checksum(buf: &mut [u8], at: usize) {
    buf[at] = 0;
    let sum = buf.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    buf[at] = sum.wrapping_neg();
}

/// Dump-file layout: crafted anchor at 0 pointing at offset 32, table at 32.
fn write_dump(path: &Path) {
    let mut table = vec![0u8, 0x12, 0x00, 0x00];
    table.extend_from_slice(&{
        let mut formatted = vec![0u8; 0x12 - 4];
        formatted[0] = 1; // vendor
        formatted[1] = 2; // version
        formatted[4] = 3; // release date
        formatted[0x09 - 4] = 0x0F;
        formatted
    });
    table.extend_from_slice(b"Initrode\x005.0\x0001/02/2019\0\0");
    table.extend_from_slice(&[127, 4, 0x01, 0x00, 0, 0]);

    let mut anchor = [0u8; 0x1F];
    anchor[..4].copy_from_slice(b"_SM_");
    anchor[0x05] = 0x1F;
    anchor[0x06] = 2;
    anchor[0x07] = 8;
    anchor[0x10..0x15].copy_from_slice(b"_DMI_");
    anchor[0x16..0x18].copy_from_slice(&(table.len() as u16).to_le_bytes());
    anchor[0x18..0x1C].copy_from_slice(&32u32.to_le_bytes());
    anchor[0x1C..0x1E].copy_from_slice(&2u16.to_le_bytes());
    fix_checksum(&mut anchor[0x10..0x1F], 0x05);
    fix_checksum(&mut anchor, 0x04);

    let mut file = anchor.to_vec();
    file.resize(32, 0);
    file.extend_from_slice(&table);
    std::fs::write(path, file).expect("write dump");
}

#[test]
fn decodes_a_dump_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dump = dir.path().join("machine.dump");
    write_dump(&dump);

    let output = Command::cargo_bin("dmi-inspect")
        .expect("binary")
        .arg("--from-dump")
        .arg(&dump)
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8");
    assert!(stdout.contains("SMBIOS 2.8 present."), "{stdout}");
    assert!(stdout.contains("\tVendor: Initrode"), "{stdout}");
    assert!(stdout.contains("End Of Table"), "{stdout}");
    // Dump input carries no meaningful table address.
    assert!(!stdout.contains("Table at"), "{stdout}");
}

#[test]
fn type_filter_and_quiet() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dump = dir.path().join("machine.dump");
    write_dump(&dump);

    let output = Command::cargo_bin("dmi-inspect")
        .expect("binary")
        .args(["--type", "bios", "--quiet", "--from-dump"])
        .arg(&dump)
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8");
    assert!(stdout.contains("BIOS Information"), "{stdout}");
    assert!(!stdout.contains("present"), "{stdout}");
    assert!(!stdout.contains("Handle"), "{stdout}");
}

#[test]
fn rejects_unknown_type_keyword() {
    let output = Command::cargo_bin("dmi-inspect")
        .expect("binary")
        .args(["--type", "gpu"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf-8");
    assert!(stderr.contains("invalid type"), "{stderr}");
}

#[test]
fn dump_bin_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dump = dir.path().join("machine.dump");
    let copy = dir.path().join("copy.dump");
    write_dump(&dump);

    Command::cargo_bin("dmi-inspect")
        .expect("binary")
        .arg("--from-dump")
        .arg(&dump)
        .arg("--dump-bin")
        .arg(&copy)
        .assert()
        .success();

    let output = Command::cargo_bin("dmi-inspect")
        .expect("binary")
        .arg("--from-dump")
        .arg(&copy)
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8");
    assert!(stdout.contains("\tVendor: Initrode"), "{stdout}");
}
