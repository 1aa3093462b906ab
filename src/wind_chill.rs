/// Calculates the apparent (felt) temperature using the wind chill index
///
/// Wind chill is only defined for cold and windy conditions, outside of that the
/// air temperature itself is returned.
///
/// # Arguments
///
/// * 'temp' - air temperature in degrees Celsius
/// * 'wind_speed' - wind speed in m/s
pub fn apparent_temperature(temp: f64, wind_speed: f64) -> f64 {
    if temp > 10.0 || wind_speed < 1.4 {
        return temp;
    }

    let v = wind_speed.powf(0.16);
    let wci = 13.12667 + 0.6215 * temp - 13.924748 * v + 0.4875195 * temp * v;

    round_to_one_decimal(wci)
}

/// Rounds values to one decimal
///
/// # Arguments
///
/// * 'value' - the value to round to one decimal
fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10f64).round() / 10f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warm_weather_is_not_adjusted() {
        assert_eq!(apparent_temperature(15.0, 10.0), 15.0);
        assert_eq!(apparent_temperature(10.01, 20.0), 10.01);
    }

    #[test]
    fn calm_weather_is_not_adjusted() {
        assert_eq!(apparent_temperature(0.0, 0.5), 0.0);
        assert_eq!(apparent_temperature(-20.0, 1.39), -20.0);
    }

    #[test]
    fn wind_chill_applies_when_cold_and_windy() {
        assert_eq!(apparent_temperature(-5.0, 10.0), -13.6);
        assert_eq!(apparent_temperature(10.0, 1.4), 9.8);
    }

    #[test]
    fn result_has_one_decimal() {
        let t = apparent_temperature(-12.3, 7.7);
        assert_eq!(t, round_to_one_decimal(t));
        assert!(t < -12.3);
    }
}
