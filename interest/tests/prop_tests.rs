use proptest::prelude::*;

use bill_interest::{
    calc_bill_value, calc_token_value_for_financing, compound_factor, BillRepayMethod,
    RepaymentMethod, FIXED_SCALE,
};
use bill_types::{Address, Bill, BillStatus, Timestamp, ONE_DAY_SECS};

fn released_bill(rate: i64, overdue_rate: i64, days: u64, grace: u64, limit: u64) -> Bill {
    Bill {
        id: "prop".into(),
        token_symbol: "PROP".into(),
        coins_symbol: "CCNY".into(),
        borrower: Address::new("core"),
        loan_amount: 1_000_000,
        rate,
        overdue_rate,
        circulation_time: days * ONE_DAY_SECS,
        overdue_grace_period: grace,
        overdue_limit: limit,
        split: true,
        repay_count: 1,
        origin_price: 0,
        name: String::new(),
        remark: String::new(),
        status: BillStatus::Released,
        create_time: Timestamp::new(0),
        issue_date: Timestamp::new(0),
        repay_date: Timestamp::new(days * ONE_DAY_SECS),
        current_repayed_count: 0,
        need_dpdt_token: false,
        dpdt_tokens: Vec::new(),
        total_cash_amount: 0,
        total_repay_amount: 0,
        total_redeem_token: 0,
        total_cashed_token: 0,
    }
}

proptest! {
    /// Compounding a non-negative rate never shrinks the factor below one.
    #[test]
    fn compound_factor_at_least_one(rate in 0i64..5_000_000, periods in 0u64..365) {
        let f = compound_factor(rate, periods).unwrap();
        prop_assert!(f >= FIXED_SCALE);
    }

    /// More periods never yield a smaller factor.
    #[test]
    fn compound_factor_monotonic(rate in 0i64..5_000_000, periods in 0u64..364) {
        let a = compound_factor(rate, periods).unwrap();
        let b = compound_factor(rate, periods + 1).unwrap();
        prop_assert!(b >= a, "factor decreased: {} -> {}", a, b);
    }

    /// Present value never exceeds face value.
    #[test]
    fn bill_value_bounded_by_face(
        face in 0u128..1_000_000_000_000,
        days in 0u64..365,
        rate in 0i64..1_000_000,
    ) {
        let v = calc_bill_value(face, days, rate).unwrap();
        prop_assert!(v <= face, "value {} > face {}", v, face);
    }

    /// The financing discount never pays more than the token amount.
    #[test]
    fn financing_value_bounded_by_amount(
        amount in 1u128..1_000_000_000_000,
        rate in 0i64..1_000_000,
        days in 0u64..365,
    ) {
        let v = calc_token_value_for_financing(amount, rate, days);
        prop_assert!(v <= amount);
    }

    /// Overdue interest stops growing once the overdue limit is reached.
    #[test]
    fn overdue_capped_at_limit(
        overdue_rate in 0i64..2_000_000,
        limit in 1u64..30,
        extra in 0u64..100,
        amount in 1u128..1_000_000_000,
    ) {
        let bill = released_bill(0, overdue_rate, 30, 0, limit);
        let at_limit = bill.due_date().plus(limit * ONE_DAY_SECS);
        let later = at_limit.plus(extra * ONE_DAY_SECS);
        let a = BillRepayMethod.calc_repay_info(&bill, at_limit, amount).unwrap().unwrap();
        let b = BillRepayMethod.calc_repay_info(&bill, later, amount).unwrap().unwrap();
        prop_assert_eq!(a.actual_amount, b.actual_amount);
        prop_assert!(b.actual_amount >= b.normal_amount);
    }

    /// Token value only rises as maturity approaches.
    #[test]
    fn token_value_non_decreasing_in_time(
        rate in 0i64..1_000_000,
        t1 in 0u64..(90 * ONE_DAY_SECS),
        dt in 0u64..(90 * ONE_DAY_SECS),
    ) {
        let bill = released_bill(rate, 0, 90, 1, 10);
        let a = BillRepayMethod.get_token_value(10_000, &bill, Timestamp::new(t1)).unwrap();
        let b = BillRepayMethod.get_token_value(10_000, &bill, Timestamp::new(t1 + dt)).unwrap();
        prop_assert!(b >= a, "value fell from {} to {}", a, b);
    }
}
