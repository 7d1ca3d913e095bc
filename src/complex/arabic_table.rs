//! Arabic joining properties from UCD 6.0.0 `ArabicShaping.txt`.

use super::{JoiningGroup as G, JoiningType as J};

/// `(codepoint, joining type, joining group)`, sorted by codepoint.
#[rustfmt::skip]
pub static JOINING_DATA: &[(u32, J, G)] = &[
    (0x0600, J::U, G::NoJoiningGroup),
    (0x0601, J::U, G::NoJoiningGroup),
    (0x0602, J::U, G::NoJoiningGroup),
    (0x0603, J::U, G::NoJoiningGroup),
    (0x0608, J::U, G::NoJoiningGroup),
    (0x060B, J::U, G::NoJoiningGroup),
    (0x0620, J::D, G::Yeh),
    (0x0621, J::U, G::NoJoiningGroup),
    (0x0622, J::R, G::Alef),
    (0x0623, J::R, G::Alef),
    (0x0624, J::R, G::Waw),
    (0x0625, J::R, G::Alef),
    (0x0626, J::D, G::Yeh),
    (0x0627, J::R, G::Alef),
    (0x0628, J::D, G::Beh),
    (0x0629, J::R, G::TehMarbuta),
    (0x062A, J::D, G::Beh),
    (0x062B, J::D, G::Beh),
    (0x062C, J::D, G::Hah),
    (0x062D, J::D, G::Hah),
    (0x062E, J::D, G::Hah),
    (0x062F, J::R, G::Dal),
    (0x0630, J::R, G::Dal),
    (0x0631, J::R, G::Reh),
    (0x0632, J::R, G::Reh),
    (0x0633, J::D, G::Seen),
    (0x0634, J::D, G::Seen),
    (0x0635, J::D, G::Sad),
    (0x0636, J::D, G::Sad),
    (0x0637, J::D, G::Tah),
    (0x0638, J::D, G::Tah),
    (0x0639, J::D, G::Ain),
    (0x063A, J::D, G::Ain),
    (0x063B, J::D, G::Gaf),
    (0x063C, J::D, G::Gaf),
    (0x063D, J::D, G::FarsiYeh),
    (0x063E, J::D, G::FarsiYeh),
    (0x063F, J::D, G::FarsiYeh),
    (0x0640, J::C, G::NoJoiningGroup),
    (0x0641, J::D, G::Feh),
    (0x0642, J::D, G::Qaf),
    (0x0643, J::D, G::Kaf),
    (0x0644, J::D, G::Lam),
    (0x0645, J::D, G::Meem),
    (0x0646, J::D, G::Noon),
    (0x0647, J::D, G::Heh),
    (0x0648, J::R, G::Waw),
    (0x0649, J::D, G::Yeh),
    (0x064A, J::D, G::Yeh),
    (0x066E, J::D, G::Beh),
    (0x066F, J::D, G::Qaf),
    (0x0671, J::R, G::Alef),
    (0x0672, J::R, G::Alef),
    (0x0673, J::R, G::Alef),
    (0x0674, J::U, G::NoJoiningGroup),
    (0x0675, J::R, G::Alef),
    (0x0676, J::R, G::Waw),
    (0x0677, J::R, G::Waw),
    (0x0678, J::D, G::Yeh),
    (0x0679, J::D, G::Beh),
    (0x067A, J::D, G::Beh),
    (0x067B, J::D, G::Beh),
    (0x067C, J::D, G::Beh),
    (0x067D, J::D, G::Beh),
    (0x067E, J::D, G::Beh),
    (0x067F, J::D, G::Beh),
    (0x0680, J::D, G::Beh),
    (0x0681, J::D, G::Hah),
    (0x0682, J::D, G::Hah),
    (0x0683, J::D, G::Hah),
    (0x0684, J::D, G::Hah),
    (0x0685, J::D, G::Hah),
    (0x0686, J::D, G::Hah),
    (0x0687, J::D, G::Hah),
    (0x0688, J::R, G::Dal),
    (0x0689, J::R, G::Dal),
    (0x068A, J::R, G::Dal),
    (0x068B, J::R, G::Dal),
    (0x068C, J::R, G::Dal),
    (0x068D, J::R, G::Dal),
    (0x068E, J::R, G::Dal),
    (0x068F, J::R, G::Dal),
    (0x0690, J::R, G::Dal),
    (0x0691, J::R, G::Reh),
    (0x0692, J::R, G::Reh),
    (0x0693, J::R, G::Reh),
    (0x0694, J::R, G::Reh),
    (0x0695, J::R, G::Reh),
    (0x0696, J::R, G::Reh),
    (0x0697, J::R, G::Reh),
    (0x0698, J::R, G::Reh),
    (0x0699, J::R, G::Reh),
    (0x069A, J::D, G::Seen),
    (0x069B, J::D, G::Seen),
    (0x069C, J::D, G::Seen),
    (0x069D, J::D, G::Sad),
    (0x069E, J::D, G::Sad),
    (0x069F, J::D, G::Tah),
    (0x06A0, J::D, G::Ain),
    (0x06A1, J::D, G::Feh),
    (0x06A2, J::D, G::Feh),
    (0x06A3, J::D, G::Feh),
    (0x06A4, J::D, G::Feh),
    (0x06A5, J::D, G::Feh),
    (0x06A6, J::D, G::Feh),
    (0x06A7, J::D, G::Qaf),
    (0x06A8, J::D, G::Qaf),
    (0x06A9, J::D, G::Gaf),
    (0x06AA, J::D, G::SwashKaf),
    (0x06AB, J::D, G::Gaf),
    (0x06AC, J::D, G::Kaf),
    (0x06AD, J::D, G::Kaf),
    (0x06AE, J::D, G::Kaf),
    (0x06AF, J::D, G::Gaf),
    (0x06B0, J::D, G::Gaf),
    (0x06B1, J::D, G::Gaf),
    (0x06B2, J::D, G::Gaf),
    (0x06B3, J::D, G::Gaf),
    (0x06B4, J::D, G::Gaf),
    (0x06B5, J::D, G::Lam),
    (0x06B6, J::D, G::Lam),
    (0x06B7, J::D, G::Lam),
    (0x06B8, J::D, G::Lam),
    (0x06B9, J::D, G::Noon),
    (0x06BA, J::D, G::Noon),
    (0x06BB, J::D, G::Noon),
    (0x06BC, J::D, G::Noon),
    (0x06BD, J::D, G::Nya),
    (0x06BE, J::D, G::KnottedHeh),
    (0x06BF, J::D, G::Hah),
    (0x06C0, J::R, G::TehMarbuta),
    (0x06C1, J::D, G::HehGoal),
    (0x06C2, J::D, G::HehGoal),
    (0x06C3, J::R, G::TehMarbutaGoal),
    (0x06C4, J::R, G::Waw),
    (0x06C5, J::R, G::Waw),
    (0x06C6, J::R, G::Waw),
    (0x06C7, J::R, G::Waw),
    (0x06C8, J::R, G::Waw),
    (0x06C9, J::R, G::Waw),
    (0x06CA, J::R, G::Waw),
    (0x06CB, J::R, G::Waw),
    (0x06CC, J::D, G::FarsiYeh),
    (0x06CD, J::R, G::YehWithTail),
    (0x06CE, J::D, G::FarsiYeh),
    (0x06CF, J::R, G::Waw),
    (0x06D0, J::D, G::Yeh),
    (0x06D1, J::D, G::Yeh),
    (0x06D2, J::R, G::YehBarree),
    (0x06D3, J::R, G::YehBarree),
    (0x06D5, J::R, G::TehMarbuta),
    (0x06DD, J::U, G::NoJoiningGroup),
    (0x06EE, J::R, G::Dal),
    (0x06EF, J::R, G::Reh),
    (0x06FA, J::D, G::Seen),
    (0x06FB, J::D, G::Sad),
    (0x06FC, J::D, G::Ain),
    (0x06FF, J::D, G::KnottedHeh),
    (0x0710, J::R, G::Alaph),
    (0x0712, J::D, G::Beth),
    (0x0713, J::D, G::Gamal),
    (0x0714, J::D, G::Gamal),
    (0x0715, J::R, G::DalathRish),
    (0x0716, J::R, G::DalathRish),
    (0x0717, J::R, G::He),
    (0x0718, J::R, G::SyriacWaw),
    (0x0719, J::R, G::Zain),
    (0x071A, J::D, G::Heth),
    (0x071B, J::D, G::Teth),
    (0x071C, J::D, G::Teth),
    (0x071D, J::D, G::Yudh),
    (0x071E, J::R, G::YudhHe),
    (0x071F, J::D, G::Kaph),
    (0x0720, J::D, G::Lamadh),
    (0x0721, J::D, G::Mim),
    (0x0722, J::D, G::Nun),
    (0x0723, J::D, G::Semkath),
    (0x0724, J::D, G::FinalSemkath),
    (0x0725, J::D, G::E),
    (0x0726, J::D, G::Pe),
    (0x0727, J::D, G::ReversedPe),
    (0x0728, J::R, G::Sadhe),
    (0x0729, J::D, G::Qaph),
    (0x072A, J::R, G::DalathRish),
    (0x072B, J::D, G::Shin),
    (0x072C, J::R, G::Taw),
    (0x072D, J::D, G::Beth),
    (0x072E, J::D, G::Gamal),
    (0x072F, J::R, G::DalathRish),
    (0x074D, J::R, G::Zhain),
    (0x074E, J::D, G::Khaph),
    (0x074F, J::D, G::Fe),
    (0x0750, J::D, G::Beh),
    (0x0751, J::D, G::Beh),
    (0x0752, J::D, G::Beh),
    (0x0753, J::D, G::Beh),
    (0x0754, J::D, G::Beh),
    (0x0755, J::D, G::Beh),
    (0x0756, J::D, G::Beh),
    (0x0757, J::D, G::Hah),
    (0x0758, J::D, G::Hah),
    (0x0759, J::R, G::Dal),
    (0x075A, J::R, G::Dal),
    (0x075B, J::R, G::Reh),
    (0x075C, J::D, G::Seen),
    (0x075D, J::D, G::Ain),
    (0x075E, J::D, G::Ain),
    (0x075F, J::D, G::Ain),
    (0x0760, J::D, G::Feh),
    (0x0761, J::D, G::Feh),
    (0x0762, J::D, G::Gaf),
    (0x0763, J::D, G::Gaf),
    (0x0764, J::D, G::Gaf),
    (0x0765, J::D, G::Meem),
    (0x0766, J::D, G::Meem),
    (0x0767, J::D, G::Noon),
    (0x0768, J::D, G::Noon),
    (0x0769, J::D, G::Noon),
    (0x076A, J::D, G::Lam),
    (0x076B, J::R, G::Reh),
    (0x076C, J::R, G::Reh),
    (0x076D, J::D, G::Seen),
    (0x076E, J::D, G::Hah),
    (0x076F, J::D, G::Hah),
    (0x0770, J::D, G::Seen),
    (0x0771, J::R, G::Reh),
    (0x0772, J::D, G::Hah),
    (0x0773, J::R, G::Alef),
    (0x0774, J::R, G::Alef),
    (0x0775, J::D, G::FarsiYeh),
    (0x0776, J::D, G::FarsiYeh),
    (0x0777, J::D, G::Yeh),
    (0x0778, J::R, G::Waw),
    (0x0779, J::R, G::Waw),
    (0x077A, J::D, G::BurushaskiYehBarree),
    (0x077B, J::D, G::BurushaskiYehBarree),
    (0x077C, J::D, G::Hah),
    (0x077D, J::D, G::Seen),
    (0x077E, J::D, G::Seen),
    (0x077F, J::D, G::Kaf),
    (0x07CA, J::D, G::NoJoiningGroup),
    (0x07CB, J::D, G::NoJoiningGroup),
    (0x07CC, J::D, G::NoJoiningGroup),
    (0x07CD, J::D, G::NoJoiningGroup),
    (0x07CE, J::D, G::NoJoiningGroup),
    (0x07CF, J::D, G::NoJoiningGroup),
    (0x07D0, J::D, G::NoJoiningGroup),
    (0x07D1, J::D, G::NoJoiningGroup),
    (0x07D2, J::D, G::NoJoiningGroup),
    (0x07D3, J::D, G::NoJoiningGroup),
    (0x07D4, J::D, G::NoJoiningGroup),
    (0x07D5, J::D, G::NoJoiningGroup),
    (0x07D6, J::D, G::NoJoiningGroup),
    (0x07D7, J::D, G::NoJoiningGroup),
    (0x07D8, J::D, G::NoJoiningGroup),
    (0x07D9, J::D, G::NoJoiningGroup),
    (0x07DA, J::D, G::NoJoiningGroup),
    (0x07DB, J::D, G::NoJoiningGroup),
    (0x07DC, J::D, G::NoJoiningGroup),
    (0x07DD, J::D, G::NoJoiningGroup),
    (0x07DE, J::D, G::NoJoiningGroup),
    (0x07DF, J::D, G::NoJoiningGroup),
    (0x07E0, J::D, G::NoJoiningGroup),
    (0x07E1, J::D, G::NoJoiningGroup),
    (0x07E2, J::D, G::NoJoiningGroup),
    (0x07E3, J::D, G::NoJoiningGroup),
    (0x07E4, J::D, G::NoJoiningGroup),
    (0x07E5, J::D, G::NoJoiningGroup),
    (0x07E6, J::D, G::NoJoiningGroup),
    (0x07E7, J::D, G::NoJoiningGroup),
    (0x07E8, J::D, G::NoJoiningGroup),
    (0x07E9, J::D, G::NoJoiningGroup),
    (0x07EA, J::D, G::NoJoiningGroup),
    (0x07FA, J::C, G::NoJoiningGroup),
    (0x200D, J::C, G::NoJoiningGroup),
];
