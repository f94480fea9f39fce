/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use mbx_image::curves::{
    clamp_pct, cubic_curve, inverted_power_curve, percentage, piecewise_curve, power_curve, round2, super_gaussian_weights
};

fn assert_close (a: f64, b: f64) {
    assert!( (a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn test_power_curve () {
    assert_close( power_curve( 0.0, 2.0), 0.0);
    assert_close( power_curve( 50.0, 2.0), 25.0);
    assert_close( power_curve( 100.0, 2.0), 100.0);
    assert_close( power_curve( 150.0, 2.0), 100.0);
}

#[test]
fn test_cubic_curve () {
    assert_close( cubic_curve( 0.0), 0.0);
    assert_close( cubic_curve( 50.0), 12.5);
    assert_close( cubic_curve( 100.0), 100.0);
    assert!( cubic_curve( 30.0) < power_curve( 30.0, 2.0));
}

#[test]
fn test_inverted_power_curve () {
    assert_close( inverted_power_curve( 0.0, 2.5), 0.0);
    assert_close( inverted_power_curve( 100.0, 2.5), 100.0);

    // amplifies small differences
    assert!( inverted_power_curve( 10.0, 2.5) > 10.0);
}

#[test]
fn test_piecewise_curve () {
    assert_close( piecewise_curve( 0.0), 0.0);
    assert_close( piecewise_curve( 20.0), 21.0);
    assert_close( piecewise_curve( 40.0), 42.0);
    assert_close( piecewise_curve( 60.0), 43.0);
    assert_close( piecewise_curve( 100.0), 45.0);
}

#[test]
fn test_curves_are_monotonic_and_bounded () {
    let mut last = (0.0, 0.0, 0.0);
    for i in 0..=1000 {
        let raw = i as f64 / 10.0;
        let v = (power_curve( raw, 2.0), inverted_power_curve( raw, 2.5), piecewise_curve( raw));

        for x in [v.0, v.1, v.2] { assert!( (0.0..=100.0).contains(&x)); }
        assert!( v.0 >= last.0 && v.1 >= last.1 && v.2 >= last.2, "not monotonic at {raw}");
        last = v;
    }
}

#[test]
fn test_super_gaussian_weights () {
    let w = super_gaussian_weights( 101);
    assert_eq!( w.len(), 101);
    assert_close( w[50], 2.5);

    for i in 0..50 {
        assert_close( w[i], w[100-i]); // symmetric
        assert!( w[i] < w[i+1]);       // increasing towards center
    }

    let w = super_gaussian_weights( 1024);
    assert_close( w[511], w[512]); // center is between the two middle columns
}

#[test]
fn test_helpers () {
    assert_eq!( round2( 33.33333), 33.33);
    assert_eq!( round2( 66.666), 66.67);
    assert_eq!( clamp_pct( -1.0), 0.0);
    assert_eq!( clamp_pct( f64::NAN), 0.0);
    assert_eq!( percentage( 1, 4), 25.0);
    assert_eq!( percentage( 0, 0), 0.0);
}
