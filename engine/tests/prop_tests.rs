use proptest::prelude::*;

use bill_engine::{
    AddCreditToken, ApplyForFinancing, CashBill, ConfirmDeliverBill, ConfirmFinancing, CreateBill,
    CreditPledge, DeliverBill, EngineConfig, FinanceAction, FinanceEngine, FinanceError, Receipt,
    ReleaseBill, RepayBill, TxContext, UnApplyForFinancing,
};
use bill_nullables::{NullAssetLedger, NullClock, NullStore};
use bill_types::{Address, AssetClass, BillStatus, Identity, TxHash, ONE_DAY_SECS};

const LOAN: u128 = 1_000;

struct World {
    engine: FinanceEngine<NullStore, NullAssetLedger>,
    clock: NullClock,
    nonce: u64,
}

fn a(s: &str) -> Address {
    Address::new(s)
}

impl World {
    fn exec(&mut self, action: FinanceAction) -> Result<Receipt, FinanceError> {
        self.nonce += 1;
        let ctx = TxContext::for_action(&action, self.nonce, self.clock.now()).unwrap();
        self.engine.execute(&ctx, action)
    }

    /// A released bill whose every token has been delivered to one supplier.
    fn new() -> Self {
        let engine = FinanceEngine::new(
            NullStore::new(),
            NullAssetLedger::new(),
            EngineConfig::default(),
        );
        let mut w = Self {
            engine,
            clock: NullClock::new(1_000_000),
            nonce: 0,
        };
        let ledger = w.engine.ledger();
        ledger.mint(AssetClass::Token, "CREDIT", &a("funder"), LOAN).unwrap();
        ledger.mint(AssetClass::Token, "BILL", &a("core"), LOAN).unwrap();
        ledger.mint(AssetClass::Coins, "token.CCNY", &a("funder"), 1_000_000).unwrap();
        ledger.mint(AssetClass::Coins, "token.CCNY", &a("core"), 1_000_000).unwrap();

        w.exec(FinanceAction::AddCreditToken(AddCreditToken {
            credit_addr: a("funder"),
            credit_identity: Identity::Funder,
            grantee_addr: a("core"),
            grantee_identity: Identity::Core,
            symbol: "CREDIT".into(),
            amount: LOAN,
            rate: 10_000,
            duration: 365 * ONE_DAY_SECS,
            remark: String::new(),
        }))
        .unwrap();
        w.exec(FinanceAction::CreateBill(CreateBill {
            addr: a("core"),
            creator_identity: Identity::Core,
            id: "B".into(),
            token_symbol: "BILL".into(),
            coins_symbol: "token.CCNY".into(),
            borrower: a("core"),
            loan_amount: LOAN,
            rate: 50_000,
            overdue_rate: 1_000_000,
            circulation_time: 30 * ONE_DAY_SECS,
            overdue_grace_period: 0,
            overdue_limit: 0,
            split: true,
            need_dpdt_token: true,
            dpdt_tokens: vec![CreditPledge {
                symbol: "CREDIT".into(),
                amount: LOAN,
            }],
            name: String::new(),
            remark: String::new(),
        }))
        .unwrap();
        w.exec(FinanceAction::ReleaseBill(ReleaseBill {
            release_addr: a("core"),
            release_identity: Identity::Core,
            id: "B".into(),
        }))
        .unwrap();
        let id = w
            .exec(FinanceAction::DeliverBill(DeliverBill {
                deliver_addr: a("core"),
                deliver_identity: Identity::Core,
                to_addr: a("supplier"),
                to_identity: Identity::Supplier,
                bill_id: "B".into(),
                amount: LOAN,
                remark: String::new(),
            }))
            .unwrap()
            .tx_hash;
        w.exec(FinanceAction::ConfirmDeliverBill(ConfirmDeliverBill {
            confirm_addr: a("supplier"),
            confirm_identity: Identity::Supplier,
            deliver_id: id,
            ack: true,
        }))
        .unwrap();
        w
    }
}

#[derive(Clone, Debug)]
enum FinancingOp {
    Apply(u128),
    Confirm(usize, bool),
    Cancel(usize),
}

fn financing_op() -> impl Strategy<Value = FinancingOp> {
    prop_oneof![
        (10u128..=400).prop_map(FinancingOp::Apply),
        (0usize..8, any::<bool>()).prop_map(|(i, ack)| FinancingOp::Confirm(i, ack)),
        (0usize..8).prop_map(FinancingOp::Cancel),
    ]
}

#[derive(Clone, Debug)]
enum CashOp {
    Cash(u128),
    Repay,
    Wait(u64),
}

fn cash_op() -> impl Strategy<Value = CashOp> {
    prop_oneof![
        (1u128..=500).prop_map(CashOp::Cash),
        Just(CashOp::Repay),
        (0u64..20).prop_map(CashOp::Wait),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Reserved credit equals what is pending plus what was funded, and never
    /// exceeds the pledge.
    #[test]
    fn financing_reservations_stay_within_pledge(
        ops in prop::collection::vec(financing_op(), 1..24),
    ) {
        let mut w = World::new();
        let mut live: Vec<(TxHash, u128)> = Vec::new();
        let mut funded: u128 = 0;

        for op in ops {
            match op {
                FinancingOp::Apply(amount) => {
                    let result = w.exec(FinanceAction::ApplyForFinancing(ApplyForFinancing {
                        apply_addr: a("supplier"),
                        apply_identity: Identity::Supplier,
                        bill_id: "B".into(),
                        dpdt_symbol: "CREDIT".into(),
                        amount,
                        remark: String::new(),
                    }));
                    if let Ok(receipt) = result {
                        live.push((receipt.tx_hash, amount));
                    }
                }
                FinancingOp::Confirm(i, ack) if !live.is_empty() => {
                    let (id, amount) = live[i % live.len()];
                    w.exec(FinanceAction::ConfirmFinancing(ConfirmFinancing {
                        confirm_addr: a("funder"),
                        confirm_identity: Identity::Funder,
                        apply_id: id,
                        ack,
                    }))
                    .unwrap();
                    live.retain(|(h, _)| *h != id);
                    if ack {
                        funded += amount;
                    }
                }
                FinancingOp::Cancel(i) if !live.is_empty() => {
                    let (id, _) = live[i % live.len()];
                    w.exec(FinanceAction::UnApplyForFinancing(UnApplyForFinancing {
                        unapply_addr: a("supplier"),
                        unapply_identity: Identity::Supplier,
                        apply_id: id,
                    }))
                    .unwrap();
                    live.retain(|(h, _)| *h != id);
                }
                _ => {}
            }

            let bill = w.engine.bill("B").unwrap();
            let pledge = bill.dpdt_token("CREDIT").unwrap();
            let pending: u128 = live.iter().map(|(_, amt)| amt).sum();
            prop_assert!(pledge.used <= pledge.amount);
            prop_assert_eq!(pledge.used, pending + funded);
            let held = w.engine.ledger().balance(AssetClass::Token, "BILL", &a("supplier"));
            prop_assert_eq!(held.frozen, pending);
            prop_assert_eq!(held.available + held.frozen + funded, LOAN);
        }
    }

    /// Redeemed tokens never exceed the loan, and full redemption always
    /// blocks the bill.
    #[test]
    fn redemption_never_exceeds_loan(ops in prop::collection::vec(cash_op(), 1..24)) {
        let mut w = World::new();

        for op in ops {
            match op {
                CashOp::Cash(amount) => {
                    let _ = w.exec(FinanceAction::CashBill(CashBill {
                        cash_addr: a("supplier"),
                        bill_id: "B".into(),
                        amount,
                    }));
                }
                CashOp::Repay => {
                    w.exec(FinanceAction::RepayBill(RepayBill {
                        repay_addr: a("core"),
                        bill_id: "B".into(),
                    }))
                    .unwrap();
                }
                CashOp::Wait(days) => w.clock.advance_days(days),
            }

            let bill = w.engine.bill("B").unwrap();
            prop_assert!(bill.total_redeem_token <= bill.loan_amount);
            if bill.total_redeem_token == bill.loan_amount {
                prop_assert_eq!(bill.status, BillStatus::Blocked);
                prop_assert_eq!(bill.current_repayed_count, bill.repay_count);
            }
            let sink = w.engine.config().sink_address.clone();
            let burned = w.engine.ledger().balance(AssetClass::Token, "BILL", &sink).available;
            prop_assert_eq!(burned, bill.total_redeem_token);
        }
    }
}
