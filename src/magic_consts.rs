//! Rook and bishop magics, a1 = 0. Regenerate with `cargo run --release --bin magics`.

pub(crate) const ROOK_MAGICS: [u64; 64] = [
    0x1080008095400020, 0x0840100040002002, 0x0100081104402000, 0x0100082100041000,
    0x0600082004420010, 0x0100010008040002, 0x0400220100885004, 0x4080002100004080,
    0x0202800084204000, 0x1002404010002000, 0xa001002000110044, 0x0002801000080080,
    0x000200200a001004, 0x2002801201040080, 0x0402800600030080, 0x0406002400845502,
    0x0280044004200040, 0x0010810020400100, 0x1020820012004020, 0x0080120020084201,
    0x4800808008000400, 0x0001010008020400, 0x07002c0009080e10, 0x0800060012418c01,
    0x4180004040002000, 0x0030500040002000, 0x0001a00480100088, 0x70500011000b0020,
    0x3081000500680010, 0x0c00020080800400, 0x0010020400018830, 0x200504820009530c,
    0x0040005028800080, 0x1090002010400040, 0x2410200101001840, 0x0000081001002100,
    0x2000040080800800, 0x0282010402000810, 0x200200080a000c01, 0x0000801060800900,
    0x1000400280018020, 0x8040004081090022, 0x4010048020048010, 0x1020100102230008,
    0x4210080004008080, 0x0402000810020004, 0x0080412210040088, 0x9040141c41820001,
    0x0008a842800b0100, 0x0001002080400100, 0x4401004010200100, 0x0036004410210a00,
    0x0120040008008080, 0x0082001008040200, 0x0000100801420400, 0x0000009c00590200,
    0x8041002080004011, 0x0000204000810011, 0x0810088042001022, 0x000a004004200812,
    0x4001001800041013, 0x4a2200081021c402, 0x000850890210180c, 0x000e008500c40822,
];

pub(crate) const ROOK_SHIFTS: [u32; 64] = [
    52, 53, 53, 53,
    53, 53, 53, 52,
    53, 54, 54, 54,
    54, 54, 54, 53,
    53, 54, 54, 54,
    54, 54, 54, 53,
    53, 54, 54, 54,
    54, 54, 54, 53,
    53, 54, 54, 54,
    54, 54, 54, 53,
    53, 54, 54, 54,
    54, 54, 54, 53,
    53, 54, 54, 54,
    54, 54, 54, 53,
    52, 53, 53, 53,
    53, 53, 53, 52,
];

pub(crate) const BISHOP_MAGICS: [u64; 64] = [
    0x11c0114502220240, 0x2002121802028800, 0xc304010411080080, 0x000820484a000114,
    0x8804030840009418, 0x032a111008400042, 0x000b980402220120, 0x010202a304104400,
    0x0000421024008481, 0x4000344802440022, 0x0008040810810000, 0x0048020a0a004410,
    0x0800040420050804, 0x0400010402c00808, 0x0004042404128803, 0x0082220104883400,
    0x0088080450c41808, 0x0810042081020080, 0x0888080400481200, 0x0828012088210000,
    0x0214021280a04436, 0x280b001202849400, 0x0004000044020880, 0x1808400216020100,
    0x0020881004080822, 0x008ad00802101200, 0x0302080d31084400, 0x1011040040440080,
    0x5000840008802011, 0x02300081010090a8, 0x0008010b1280d804, 0x03004100024c0220,
    0x8002a00404202804, 0x8084042220208204, 0x2004004800440020, 0x0800208020180201,
    0x00a0820200040108, 0x1081010d00020050, 0x11c8008400412101, 0x0c04008020208c00,
    0x8002080208004201, 0x6010808460007084, 0x051412010108b000, 0x0000006011080808,
    0x0411401008803100, 0x0044353241000200, 0x0404080801000060, 0x1110008208419882,
    0x4c01011110414002, 0x40808c0082100420, 0x0020930280b00800, 0x0280050442020000,
    0x1040014042820000, 0x0010c38801010000, 0x8428700408024000, 0x0020c41400802200,
    0x0800208048084084, 0x080082024a480440, 0x3005000080844100, 0x0008024280208810,
    0x0202200040050100, 0x0008302002020208, 0x0000c8a0090e1208, 0x42a4600204010110,
];

pub(crate) const BISHOP_SHIFTS: [u32; 64] = [
    58, 59, 59, 59,
    59, 59, 59, 58,
    59, 59, 59, 59,
    59, 59, 59, 59,
    59, 59, 57, 57,
    57, 57, 59, 59,
    59, 59, 57, 55,
    55, 57, 59, 59,
    59, 59, 57, 55,
    55, 57, 59, 59,
    59, 59, 57, 57,
    57, 57, 59, 59,
    59, 59, 59, 59,
    59, 59, 59, 59,
    58, 59, 59, 59,
    59, 59, 59, 58,
];
