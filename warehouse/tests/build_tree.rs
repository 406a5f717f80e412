use anyhow::Result;
use warehouse::{Split, Warehouse, GOOD_CATEGORY};

#[test]
fn build_two_anomalies_creates_nine_directories() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let base = dir.path().join("data_warehouse");
    let mut warehouse = Warehouse::new(&base);

    let layout = warehouse.build("Bottle Cap", &["Crack", "Missing Seal"])?;
    assert_eq!(layout.object(), "Bottle_Cap");
    assert_eq!(layout.anomalies(), ["Crack", "Missing_Seal"]);
    assert_eq!(
        layout.category_dir(Split::Test, "Missing Seal"),
        base.join("dataset/Bottle_Cap/test/Missing_Seal")
    );

    let report = warehouse.report().unwrap();
    assert_eq!(report.created.len(), 9);
    assert!(report.is_complete());

    let expect = [
        "",
        "dataset",
        "dataset/Bottle_Cap",
        "dataset/Bottle_Cap/train",
        "dataset/Bottle_Cap/train/good",
        "dataset/Bottle_Cap/test",
        "dataset/Bottle_Cap/test/good",
        "dataset/Bottle_Cap/test/Crack",
        "dataset/Bottle_Cap/test/Missing_Seal",
    ];
    for rel in expect {
        assert!(base.join(rel).is_dir(), "missing {}", rel);
    }
    assert!(!base
        .join("dataset/Bottle_Cap/train")
        .join("Crack")
        .exists());

    Ok(())
}

#[test]
fn build_keeps_existing_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut warehouse = Warehouse::new(dir.path());

    let good = warehouse
        .build("obj", &["dent"])?
        .category_dir(Split::Train, GOOD_CATEGORY)
        .join("cam_0_left");
    std::fs::create_dir_all(&good)?;
    std::fs::write(good.join("000.png"), b"pixels")?;

    warehouse.build("obj", &["dent", "scratch"])?;
    let report = warehouse.report().unwrap();
    assert_eq!(report.created, [dir.path().join("dataset/obj/test/scratch")]);
    assert!(good.join("000.png").is_file());

    Ok(())
}
