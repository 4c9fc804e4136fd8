//! Bundled default samples for the natural-log lookup table.
//!
//! 129 evenly spaced samples of `ln(m)` for `m` in [1, 2] at 1/128
//! spacing, precomputed at 18-decimal precision. Deployments may supply
//! their own samples through `Transcendentals::set_ln`; these defaults
//! bound the interpolation error below `8e-6` absolute.

use types::numeric::Fixed;

/// Number of bundled samples.
pub const LN_SAMPLES: usize = 129;

/// Key spacing: 1/128 in raw mantissa units.
pub const LN_KEY_STEP: i128 = Fixed::SCALE / 128;

/// `ln(1 + i/128)` scaled by `10^18`, truncated toward zero.
pub const LN_VALUES: [i128; LN_SAMPLES] = [
    0, 7782140442054948, 15504186535965254, 23167059281534378,
    30771658666753688, 38318864302136599, 45809536031294203, 53244514518812282,
    60624621816434842, 67950661908507749, 75223421237587525, 82443669211074591,
    89612158689687132, 96729626458551112, 103796793681643564, 110814366340290114,
    117783035656383454, 124703478500957235, 131576357788719272, 138402322859119135,
    145182009844497897, 151916042025841975, 158605030176638584, 165249572895307162,
    171850256926659222, 178407657472818297, 184922338494011992, 191394852999629454,
    197825743329919880, 204215541428690891, 210564769107349637, 216873938300614359,
    223143551314209755, 229374101064845829, 235566071312766909, 241719936887145168,
    247836163904581256, 253915209980963444, 259957524436926066, 265963548497137941,
    271933715483641758, 277868451003456306, 283768173130644598, 289633292583042676,
    295464212893835876, 301261330578161781, 307025035294911862, 312755710003896888,
    318453731118534615, 324119468654211976, 329753286372467981, 335355541921137830,
    340926586970593210, 346466767346208580, 351976423157178184, 357455888921803774,
    362905493689368453, 368325561158707653, 373716409793584080, 379078352934969458,
    384411698910332039, 389716751140025213, 394993808240868978, 400243164127012706,
    405465108108164381, 410659924985268385, 415827895143710965, 420969294644129636,
    426084395310900063, 431173464818371340, 436236766774918070, 441274560804875229,
    446287102628419511, 451274644139458585, 456237433481587594, 461175715122170166,
    466089729924599224, 470979715218791012, 475845904869963914, 480688529345751907,
    485507815781700807, 490303988045193838, 495077266797851514, 499827869556449329,
    504556010752395287, 509261901789807946, 513945751102234316, 518607764208045632,
    523248143764547836, 527867089620842385, 532464798869471843, 537041465896883654,
    541597282432744371, 546132437598135650, 550647117952662279, 555141507540501592,
    559615787935422686, 564070138284802966, 568504735352668712, 572919753561785509,
    577315365034823604, 581691739634622482, 586049045003578208, 590387446602176374,
    594707107746692789, 599008189646083399, 603290851438084262, 607555250224541795,
    611801541105992903, 616029877215514019, 620240409751857528, 624433288011893501,
    628608659422374137, 632766669571037829, 636907462237069231, 641031179420931291,
    645137961373584701, 649227946625109818, 653301272012745638, 657358072708360030,
    661398482245365008, 665422632545090448, 669430653942629267, 673422675212166720,
    677398823591806140, 681359224807903068, 685304003098919416, 689233281238808980,
    693147180559945309,
];

/// The bundled sample set as `(keys, values)` ready for
/// `Transcendentals::set_ln`.
pub fn default_ln_samples() -> (Vec<Fixed>, Vec<Fixed>) {
    let keys = (0..LN_SAMPLES)
        .map(|i| Fixed::from_raw(Fixed::SCALE + i as i128 * LN_KEY_STEP))
        .collect();
    let values = LN_VALUES.iter().copied().map(Fixed::from_raw).collect();
    (keys, values)
}
