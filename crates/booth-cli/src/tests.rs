use super::*;
use crate::cart::CartCommands;
use crate::catalog::CatalogCommands;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["booth"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_catalog_list_defaults() {
    let cli = Cli::try_parse_from(["booth", "catalog", "list"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog {
            command: CatalogCommands::List {
                featured: false,
                category: None,
                search: None,
                page: 1,
                limit: None,
            }
        })
    ));
}

#[test]
fn parses_catalog_list_filters() {
    let cli = Cli::try_parse_from([
        "booth", "catalog", "list", "--featured", "--category", "skincare", "--page", "3",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Catalog {
            command:
                CatalogCommands::List {
                    featured,
                    category,
                    page,
                    ..
                },
        }) => {
            assert!(featured);
            assert_eq!(category.as_deref(), Some("skincare"));
            assert_eq!(page, 3);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_cart_add_with_variants() {
    let cli = Cli::try_parse_from([
        "booth",
        "cart",
        "add",
        "rose-mist",
        "--qty",
        "2",
        "--variant",
        "Size=50ml",
        "--variant",
        "Shade=rose",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Cart {
            command:
                CartCommands::Add {
                    slug,
                    qty,
                    variants,
                },
        }) => {
            assert_eq!(slug, "rose-mist");
            assert_eq!(qty, 2);
            assert_eq!(
                variants,
                vec![
                    ("Size".to_owned(), "50ml".to_owned()),
                    ("Shade".to_owned(), "rose".to_owned()),
                ]
            );
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rejects_malformed_variant() {
    let result = Cli::try_parse_from(["booth", "cart", "add", "x", "--variant", "Size"]);
    assert!(result.is_err());
}

#[test]
fn parses_cart_add_combo() {
    let cli = Cli::try_parse_from([
        "booth", "cart", "add-combo", "glow-kit", "--skip", "p2", "--more", "p1=2",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Cart {
            command: CartCommands::AddCombo { slug, skip, more },
        }) => {
            assert_eq!(slug, "glow-kit");
            assert_eq!(skip, vec!["p2".to_owned()]);
            assert_eq!(more, vec![("p1".to_owned(), "2".to_owned())]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_coupon_apply() {
    let cli = Cli::try_parse_from([
        "booth", "coupon", "apply", "SAVE10", "--type", "percentage", "--value", "10",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Coupon {
            command:
                CouponCommands::Apply {
                    code,
                    discount_type,
                    value,
                },
        }) => {
            assert_eq!(code, "SAVE10");
            assert_eq!(discount_type, booth_core::DiscountType::Percentage);
            assert_eq!(value, rust_decimal::Decimal::from(10));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rejects_unknown_discount_type() {
    let result = Cli::try_parse_from([
        "booth", "coupon", "apply", "X", "--type", "bogo", "--value", "1",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_shipping_zone() {
    let cli = Cli::try_parse_from(["booth", "shipping", "set", "Outside"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Shipping {
            command: ShippingCommands::Set {
                zone: ShippingZone::Outside
            }
        })
    ));
}

#[test]
fn parses_checkout_as_guest_by_default() {
    let cli = Cli::try_parse_from([
        "booth",
        "checkout",
        "--name",
        "Ayesha Rahman",
        "--phone",
        "01712345678",
        "--line1",
        "House 12, Road 5",
        "--division",
        "3",
        "--district",
        "47",
        "--upazila",
        "493",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Checkout(args)) => {
            assert!(!args.account);
            assert_eq!(args.country, "Bangladesh");
            assert_eq!(args.location.division.as_deref(), Some("3"));
            assert!(args.location.union.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn checkout_requires_name() {
    let result = Cli::try_parse_from(["booth", "checkout", "--phone", "01712345678"]);
    assert!(result.is_err());
}

#[test]
fn parses_track_with_global_session() {
    let cli = Cli::try_parse_from(["booth", "track", "ORD12345", "--session", "/tmp/s.json"])
        .expect("expected valid cli args");
    assert_eq!(cli.session, Some(PathBuf::from("/tmp/s.json")));
    assert!(matches!(cli.command, Some(Commands::Track { ref id }) if id == "ORD12345"));
}

#[test]
fn parse_variant_trims_parts() {
    assert_eq!(
        parse_variant(" Size = 50ml "),
        Ok(("Size".to_owned(), "50ml".to_owned()))
    );
    assert!(parse_variant("=x").is_err());
    assert!(parse_variant("Size=").is_err());
}

#[test]
fn parses_cart_variant_change() {
    let cli = Cli::try_parse_from([
        "booth", "cart", "variant", "rose-mist", "--from", "Shade=rose", "--to", "Shade=coral",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Cart {
            command: CartCommands::Variant { slug, from, to },
        }) => {
            assert_eq!(slug, "rose-mist");
            assert_eq!(from, vec![("Shade".to_owned(), "rose".to_owned())]);
            assert_eq!(to, vec![("Shade".to_owned(), "coral".to_owned())]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn cart_variant_change_requires_a_target() {
    let result = Cli::try_parse_from(["booth", "cart", "variant", "rose-mist"]);
    assert!(result.is_err());
}
